//! Caller-supplied catalog hints.
//!
//! The converter consults three descriptive maps: unique-index columns
//! per table (merge join conditions), authoritative column order per
//! table (INSERTs without a column list), and auto-increment columns per
//! table (stripped from DML). They are hints, not sources of truth; a
//! missing table simply disables the rewrite that needs it.
//!
//! The unique-index map is ordered by index name so the generated OR
//! condition is stable across runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogHints {
    /// table → (index name → ordered column list)
    #[serde(default)]
    pub unique_indexes: HashMap<String, BTreeMap<String, Vec<String>>>,
    /// table → ordered column list
    #[serde(default)]
    pub table_columns: HashMap<String, Vec<String>>,
    /// table → auto-increment column names
    #[serde(default)]
    pub auto_increment: HashMap<String, BTreeSet<String>>,
}

impl CatalogHints {
    pub fn new(
        unique_indexes: HashMap<String, BTreeMap<String, Vec<String>>>,
        table_columns: HashMap<String, Vec<String>>,
        auto_increment: HashMap<String, BTreeSet<String>>,
    ) -> Self {
        Self {
            unique_indexes,
            table_columns,
            auto_increment,
        }
    }

    /// Register a unique index for a table
    pub fn with_unique_index(
        mut self,
        table: impl Into<String>,
        index: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.unique_indexes
            .entry(table.into())
            .or_default()
            .insert(index.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    /// Register the authoritative column order for a table
    pub fn with_columns(
        mut self,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.table_columns
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    /// Register an auto-increment column for a table
    pub fn with_auto_increment(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.auto_increment
            .entry(table.into())
            .or_default()
            .insert(column.into());
        self
    }

    pub(crate) fn unique_indexes_for(
        &self,
        table: &str,
    ) -> Option<&BTreeMap<String, Vec<String>>> {
        self.unique_indexes.get(table)
    }

    pub(crate) fn columns_for(&self, table: &str) -> Option<&Vec<String>> {
        self.table_columns.get(table)
    }

    pub(crate) fn increment_columns_for(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.auto_increment.get(table).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_helpers() {
        let hints = CatalogHints::default()
            .with_unique_index("t", "uq", ["a", "b"])
            .with_columns("t", ["id", "a", "b"])
            .with_auto_increment("t", "id");
        assert_eq!(hints.unique_indexes_for("t").unwrap()["uq"], vec!["a", "b"]);
        assert_eq!(hints.columns_for("t").unwrap().len(), 3);
        assert!(hints.increment_columns_for("t").unwrap().contains("id"));
        assert!(hints.increment_columns_for("missing").is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let hints = CatalogHints::default()
            .with_unique_index("notice_status_new", "indexs", ["conversation", "user_id"])
            .with_auto_increment("notice_status_new", "id");
        let json = serde_json::to_string(&hints).expect("serialize");
        let back: CatalogHints = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(hints, back);
    }
}
