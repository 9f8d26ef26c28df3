//! Statement rewrites from MySQL semantics to DM semantics.
//!
//! Dispatches on the parsed statement kind:
//! - INSERT/REPLACE: strip auto-increment columns, then upgrade to a
//!   MERGE when the statement has upsert semantics and a covering
//!   unique index is configured;
//! - UPDATE: drop assignments to auto-increment columns;
//! - SELECT: drop `FORCE INDEX` hints;
//! - CREATE TABLE: rebuild as DM DDL (`IDENTITY`, `VARCHAR(n CHAR)`, ...);
//! - CREATE/DROP DATABASE: rebuild as schema DDL;
//! - USE: rebuild as `SET SCHEMA`.
//!
//! A `None` result means "no structural rewrite": the converter re-emits
//! the original text through the substitution table (ALTER and other
//! non-CREATE DDL take this path).

use crate::catalog::CatalogHints;
use crate::error::{Error, Result};
use crate::expressions::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static AUTO_INCREMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"auto_increment=\d+").expect("valid regex"));

/// MySQL base types the DDL path knows how to carry to DM
static KNOWN_TYPES: &[&str] = &[
    "bit", "tinyint", "smallint", "mediumint", "int", "integer", "bigint", "bool", "boolean",
    "float", "double", "real", "decimal", "numeric", "date", "time", "datetime", "timestamp",
    "year", "char", "varchar", "binary", "varbinary", "text", "tinytext", "mediumtext",
    "longtext", "blob", "tinyblob", "mediumblob", "longblob", "enum", "set", "json", "geometry",
    "point", "linestring", "polygon", "geometrycollection", "multipoint", "multilinestring",
    "multipolygon",
];

/// Rewrite a parsed statement for the target dialect. `Ok(None)` means
/// the statement has no structural rewrite and the caller should emit
/// the source text through the substitution pass instead.
pub(crate) fn rewrite_statement(
    hints: &CatalogHints,
    statement: Statement,
) -> Result<Option<Statement>> {
    match statement {
        Statement::Insert(insert) => Ok(Some(rewrite_insert(hints, *insert))),
        Statement::Update(update) => Ok(Some(Statement::Update(Box::new(
            purge_increment_assignments(hints, *update),
        )))),
        Statement::Select(select) => Ok(Some(Statement::Select(Box::new(strip_force_hints(
            *select,
        ))))),
        Statement::Ddl(ddl) => match ddl.action {
            DdlAction::Create => Ok(Some(Statement::DmDdl(Box::new(dm_ddl_from_create(*ddl)?)))),
            _ => Ok(None),
        },
        Statement::DbDdl(db_ddl) => Ok(Some(Statement::DmDbDdl(Box::new(DmDbDdl {
            action: db_ddl.action,
            name: db_ddl.name,
            if_exists: db_ddl.if_exists,
        })))),
        Statement::Use(use_stmt) => Ok(Some(Statement::DmUse(Box::new(DmUse {
            db_name: use_stmt.db_name,
        })))),
        other => Ok(Some(other)),
    }
}

// ---------------------------------------------------------------------------
// INSERT → MERGE
// ---------------------------------------------------------------------------

fn rewrite_insert(hints: &CatalogHints, insert: Insert) -> Statement {
    let mut insert = trim_increment_columns(hints, insert);

    if insert.action == InsertAction::Insert && insert.on_dup.is_empty() {
        return Statement::Insert(Box::new(insert));
    }
    // an INSERT without a column list cannot be upgraded
    if insert.columns.is_empty() {
        return Statement::Insert(Box::new(insert));
    }
    // literal rows are required to build the USING clause
    let rows = match &insert.rows {
        InsertRows::Values(rows) if !rows.is_empty() => rows.clone(),
        _ => return Statement::Insert(Box::new(insert)),
    };

    let condcols = covering_unique_indexes(hints, &insert);
    if condcols.is_empty() {
        insert.on_dup.clear();
        return Statement::Insert(Box::new(insert));
    }

    let Some(condition) = join_condition(&insert.columns, &condcols) else {
        return Statement::Insert(Box::new(insert));
    };
    let mut matched = matched_exprs(&insert, &rows, &condcols);
    if matched.is_empty() {
        insert.on_dup.clear();
        return Statement::Insert(Box::new(insert));
    }
    qualify_bare_columns(&mut matched, "t");

    let unmatched = UnmatchedExpr {
        columns: insert.columns.clone(),
        values: insert
            .columns
            .iter()
            .map(|column| ColName::qualified("s", column.clone()))
            .collect(),
    };
    let source = VirtualTableExpr {
        rows,
        name: TableIdent::new("s"),
        columns: insert.columns.clone(),
    };

    Statement::Merge(Box::new(Merge {
        comments: insert.comments,
        table: MergeTableExpr {
            target: insert.table,
            alias: TableIdent::new("t"),
            source,
            condition,
        },
        matched,
        unmatched,
    }))
}

/// Drop auto-increment columns from the column list and the matching
/// position of every VALUES row. An INSERT without a column list first
/// inherits the authoritative column order from the catalog.
fn trim_increment_columns(hints: &CatalogHints, mut insert: Insert) -> Insert {
    let InsertRows::Values(rows) = &mut insert.rows else {
        return insert;
    };
    let Some(increments) = hints.increment_columns_for(insert.table.name.as_str()) else {
        return insert;
    };

    if insert.columns.is_empty() {
        if let Some(columns) = hints.columns_for(insert.table.name.as_str()) {
            insert.columns = columns.iter().map(ColIdent::new).collect();
        }
    }

    let removed: Vec<usize> = insert
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| increments.contains(column.as_str()))
        .map(|(i, _)| i)
        .collect();
    if removed.is_empty() {
        return insert;
    }

    insert.columns = std::mem::take(&mut insert.columns)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, column)| column)
        .collect();
    for row in rows.iter_mut() {
        *row = std::mem::take(row)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, value)| value)
            .collect();
    }
    insert
}

/// Every configured unique index whose columns are all present in the
/// INSERT's column list, in index-name order.
fn covering_unique_indexes(hints: &CatalogHints, insert: &Insert) -> Vec<Vec<String>> {
    let Some(indexes) = hints.unique_indexes_for(insert.table.name.as_str()) else {
        return Vec::new();
    };
    indexes
        .values()
        .filter(|index_columns| {
            index_columns
                .iter()
                .all(|c| insert.columns.iter().any(|col| col.as_str() == c))
        })
        .cloned()
        .collect()
}

/// OR over the covering indexes, AND of `t.c = s.c` within each.
/// Columns compare in INSERT column order.
fn join_condition(columns: &[ColIdent], condcols: &[Vec<String>]) -> Option<Expr> {
    let mut disjuncts: Option<Expr> = None;
    for condcol in condcols {
        let mut conjuncts: Option<Expr> = None;
        for column in columns {
            if !condcol.iter().any(|c| c == column.as_str()) {
                continue;
            }
            let comparison = Expr::equals(
                Expr::Column(ColName::qualified("t", column.clone())),
                Expr::Column(ColName::qualified("s", column.clone())),
            );
            conjuncts = Some(match conjuncts {
                None => comparison,
                Some(prev) => Expr::and(prev, comparison),
            });
        }
        if let Some(conjunct) = conjuncts {
            disjuncts = Some(match disjuncts {
                None => conjunct,
                Some(prev) => Expr::or(prev, conjunct),
            });
        }
    }
    disjuncts
}

/// The WHEN MATCHED assignment list: the explicit ON DUPLICATE KEY
/// UPDATE list when present, otherwise derived from the first VALUES
/// row. Assignments to condition columns are excluded either way.
fn matched_exprs(
    insert: &Insert,
    rows: &[Vec<Expr>],
    condcols: &[Vec<String>],
) -> Vec<UpdateExpr> {
    let cond_names: HashSet<&str> = condcols
        .iter()
        .flat_map(|cols| cols.iter().map(String::as_str))
        .collect();

    if !insert.on_dup.is_empty() {
        return insert
            .on_dup
            .iter()
            .filter(|expr| !cond_names.contains(expr.name.name.as_str()))
            .cloned()
            .collect();
    }

    let Some(first_row) = rows.first() else {
        return Vec::new();
    };
    insert
        .columns
        .iter()
        .enumerate()
        .filter(|(i, column)| *i < first_row.len() && !cond_names.contains(column.as_str()))
        .map(|(i, column)| UpdateExpr {
            name: ColName::bare(column.clone()),
            expr: first_row[i].clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// UPDATE / SELECT
// ---------------------------------------------------------------------------

/// Drop assignments whose target is an auto-increment column
fn purge_increment_assignments(hints: &CatalogHints, mut update: Update) -> Update {
    let Some(table) = update.table_name().map(|t| t.name.name.clone()) else {
        return update;
    };
    let Some(increments) = hints.increment_columns_for(&table) else {
        return update;
    };
    update
        .exprs
        .retain(|expr| !increments.contains(expr.name.name.as_str()));
    update
}

/// Remove `FORCE INDEX` hints from top-level FROM entries
fn strip_force_hints(mut select: Select) -> Select {
    for table in &mut select.from {
        if let TableExpr::Aliased(aliased) = table {
            if aliased
                .hints
                .as_ref()
                .map(|h| h.hint_type == "force ")
                .unwrap_or(false)
            {
                aliased.hints = None;
            }
        }
    }
    select
}

// ---------------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------------

/// Rebuild a CREATE TABLE as DM DDL, lifting the `AUTO_INCREMENT=n`
/// seed out of the raw table options.
fn dm_ddl_from_create(ddl: Ddl) -> Result<DmDdl> {
    let table_spec = match ddl.table_spec {
        Some(spec) => spec,
        None => {
            return Ok(DmDdl {
                action: ddl.action,
                table: ddl.table,
                new_name: ddl.new_name,
                if_exists: ddl.if_exists,
                table_spec: None,
            })
        }
    };

    let seed = AUTO_INCREMENT_RE
        .find(&table_spec.options)
        .map(|m| {
            let text = m.as_str();
            if text.len() >= 15 {
                text[15..].to_string()
            } else {
                String::new()
            }
        })
        .unwrap_or_default();

    let mut columns = Vec::with_capacity(table_spec.columns.len());
    for column in table_spec.columns {
        if !KNOWN_TYPES.contains(&column.typ.type_name.as_str()) {
            return Err(Error::UnimplementedType(column.typ.type_name));
        }
        columns.push(DmColumnDefinition {
            name: column.name,
            typ: DmColumnType {
                type_name: column.typ.type_name,
                length: column.typ.length,
                scale: column.typ.scale,
                unsigned: column.typ.unsigned,
                zerofill: column.typ.zerofill,
                not_null: column.typ.not_null,
                autoincrement: column.typ.autoincrement,
                seed: seed.clone(),
                default: column.typ.default,
                comment: column.typ.comment,
                key_opt: column.typ.key_opt,
            },
        });
    }

    Ok(DmDdl {
        action: ddl.action,
        table: ddl.table,
        new_name: ddl.new_name,
        if_exists: ddl.if_exists,
        table_spec: Some(DmTableSpec {
            columns,
            indexes: table_spec.indexes,
            options: table_spec.options,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::parser::parse;

    fn rewrite(hints: &CatalogHints, sql: &str) -> Option<Statement> {
        rewrite_statement(hints, parse(sql).expect("parse failed")).expect("rewrite failed")
    }

    #[test]
    fn test_insert_without_on_dup_stays_insert() {
        let hints = CatalogHints::default();
        let stmt = rewrite(&hints, "insert into t (a) values (1)").unwrap();
        assert!(matches!(stmt, Statement::Insert(_)));
    }

    #[test]
    fn test_on_dup_dropped_without_covering_index() {
        let hints = CatalogHints::default();
        let stmt = rewrite(
            &hints,
            "insert into t (a) values (1) on duplicate key update a = 2",
        )
        .unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(insert.on_dup.is_empty());
    }

    #[test]
    fn test_on_dup_becomes_merge_with_covering_index() {
        let hints = CatalogHints::default().with_unique_index("t", "uq", ["a"]);
        let stmt = rewrite(
            &hints,
            "insert into t (a, b) values (1, 2) on duplicate key update b = 3",
        )
        .unwrap();
        let Statement::Merge(merge) = stmt else {
            panic!("expected merge");
        };
        assert_eq!(merge.matched.len(), 1);
        assert_eq!(
            merge.matched[0]
                .name
                .qualifier
                .as_ref()
                .unwrap()
                .name
                .as_str(),
            "t"
        );
        assert_eq!(merge.unmatched.columns.len(), 2);
    }

    #[test]
    fn test_replace_becomes_merge_with_derived_matched() {
        let hints = CatalogHints::default().with_unique_index("t", "uq", ["a"]);
        let stmt = rewrite(&hints, "replace into t (a, b, c) values (1, 'x', 'y')").unwrap();
        let Statement::Merge(merge) = stmt else {
            panic!("expected merge");
        };
        // matched derives from the first row, condition columns excluded
        assert_eq!(merge.matched.len(), 2);
        assert_eq!(merge.matched[0].name.name.as_str(), "b");
        assert_eq!(merge.matched[1].name.name.as_str(), "c");
    }

    #[test]
    fn test_replace_without_covering_index_stays_replace() {
        let hints = CatalogHints::default();
        let stmt = rewrite(&hints, "replace into t (a) values (1)").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.action, InsertAction::Replace);
    }

    #[test]
    fn test_matched_never_assigns_condition_columns() {
        let hints = CatalogHints::default().with_unique_index("t", "uq", ["a"]);
        let stmt = rewrite(
            &hints,
            "insert into t (a, b) values (1, 2) on duplicate key update a = 9, b = 3",
        )
        .unwrap();
        let Statement::Merge(merge) = stmt else {
            panic!("expected merge");
        };
        assert_eq!(merge.matched.len(), 1);
        assert_eq!(merge.matched[0].name.name.as_str(), "b");
    }

    #[test]
    fn test_all_condition_columns_falls_back_to_insert() {
        let hints = CatalogHints::default().with_unique_index("t", "uq", ["a"]);
        let stmt = rewrite(
            &hints,
            "insert into t (a) values (1) on duplicate key update a = 2",
        )
        .unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(insert.on_dup.is_empty());
    }

    #[test]
    fn test_increment_columns_trimmed() {
        let hints = CatalogHints::default().with_auto_increment("t", "id");
        let stmt = rewrite(&hints, "insert into t (id, a) values (0, 'x'), (1, 'y')").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.columns.len(), 1);
        assert_eq!(insert.columns[0].as_str(), "a");
        let InsertRows::Values(rows) = &insert.rows else {
            panic!("expected values");
        };
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_missing_column_list_filled_from_catalog() {
        let hints = CatalogHints::default()
            .with_auto_increment("t", "id")
            .with_columns("t", ["id", "a", "b"]);
        let stmt = rewrite(&hints, "insert into t values (1, 2, 3)").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(
            insert.columns.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        let InsertRows::Values(rows) = &insert.rows else {
            panic!("expected values");
        };
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_update_increment_assignment_dropped() {
        let hints = CatalogHints::default().with_auto_increment("t", "id");
        let stmt = rewrite(&hints, "update t set id = 5, a = 'x' where a = 'y'").unwrap();
        let Statement::Update(update) = stmt else {
            panic!("expected update");
        };
        assert_eq!(update.exprs.len(), 1);
        assert_eq!(update.exprs[0].name.name.as_str(), "a");
    }

    #[test]
    fn test_select_force_hint_stripped_but_use_kept() {
        let hints = CatalogHints::default();
        let stmt = rewrite(&hints, "select a from t force index (ix)").unwrap();
        assert_eq!(Generator::sql(&stmt), "select a from t");
        let stmt = rewrite(&hints, "select a from t use index (ix)").unwrap();
        assert_eq!(Generator::sql(&stmt), "select a from t use index (ix)");
    }

    #[test]
    fn test_alter_yields_no_rewrite() {
        let hints = CatalogHints::default();
        assert!(rewrite(&hints, "alter table t add c int").is_none());
    }

    #[test]
    fn test_drop_table_yields_no_rewrite() {
        let hints = CatalogHints::default();
        assert!(rewrite(&hints, "drop table if exists t").is_none());
    }

    #[test]
    fn test_create_table_seed_lifted() {
        let hints = CatalogHints::default();
        let stmt = rewrite(
            &hints,
            "CREATE TABLE t (\n  id bigint(20) NOT NULL AUTO_INCREMENT,\n  PRIMARY KEY (id)\n) ENGINE=InnoDB AUTO_INCREMENT=493 DEFAULT CHARSET=utf8",
        )
        .unwrap();
        let Statement::DmDdl(ddl) = stmt else {
            panic!("expected dm ddl");
        };
        let spec = ddl.table_spec.as_ref().unwrap();
        assert_eq!(spec.columns[0].typ.seed, "493");
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let hints = CatalogHints::default();
        let parsed = parse("create table t (a frob)").unwrap();
        let err = rewrite_statement(&hints, parsed).unwrap_err();
        assert!(matches!(err, Error::UnimplementedType(_)));
    }

    #[test]
    fn test_use_becomes_set_schema() {
        let hints = CatalogHints::default();
        let stmt = rewrite(&hints, "use db1").unwrap();
        assert_eq!(Generator::sql(&stmt), "set schema db1");
    }

    #[test]
    fn test_db_ddl_becomes_schema_ddl() {
        let hints = CatalogHints::default();
        let stmt = rewrite(&hints, "create database baas").unwrap();
        assert_eq!(Generator::sql(&stmt), "create schema baas");
        let stmt = rewrite(&hints, "drop database if exists baas").unwrap();
        assert_eq!(Generator::sql(&stmt), "drop schema if exists baas");
    }
}
