//! dameng-sql - MySQL to DM (Dameng) SQL translation library
//!
//! This library translates statements written in MySQL dialect into SQL
//! acceptable to DM, an Oracle-compatible engine, re-indexing bound
//! parameters along the way.
//!
//! # Architecture
//!
//! The translation is a pipeline:
//! 1. **Classifier** - sniffs the leading keyword to pick a statement kind
//! 2. **FK splitter** - lifts CREATE TABLE constraints into follow-ups
//! 3. **Tokenizer / Parser** - builds a MySQL AST from the text
//! 4. **Rewriter** - rebuilds the AST with DM semantics
//!    (`INSERT ... ON DUPLICATE KEY UPDATE` to `MERGE`, `AUTO_INCREMENT`
//!    to `IDENTITY`, `USE` to `SET SCHEMA`, ...)
//! 5. **Re-binder** - renumbers `:vN` placeholders and permutes the
//!    caller's argument vector to match
//! 6. **Generator** - renders the target AST, then applies the final
//!    character substitutions (backticks, zero dates, escaped quotes)
//!
//! # Example
//!
//! ```
//! use dameng_sql::{CatalogHints, Converter};
//!
//! let hints = CatalogHints::default()
//!     .with_unique_index("notice_status_new", "indexs", ["conversation", "user_id"]);
//! let converter = Converter::new(hints);
//!
//! let result = converter
//!     .convert(
//!         "INSERT INTO notice_status_new(conversation, user_id, valid) \
//!          VALUES (157, 88897133, 1) ON DUPLICATE KEY UPDATE valid = 1",
//!         &[],
//!     )
//!     .unwrap();
//! assert!(result.outputs[0].starts_with("merge into notice_status_new t using"));
//! ```

pub mod batch;
pub mod catalog;
pub mod converter;
pub mod error;
pub mod expressions;
pub mod fk_split;
pub mod generator;
pub mod parser;
pub mod tokens;
pub mod transforms;

pub use catalog::CatalogHints;
pub use converter::{BindValue, Conversion, Converter};
pub use error::{Error, Result};
pub use expressions::{Expr, Statement};
pub use generator::Generator;
pub use parser::{parse, preview, StatementKind};
pub use tokens::{Token, TokenType, Tokenizer};

/// Translate a single statement with no catalog hints and no arguments.
///
/// Equivalent to `Converter::default().convert(sql, &[])`. Rewrites that
/// need catalog knowledge (merge upgrades, auto-increment stripping)
/// are disabled without hints; everything else applies.
pub fn convert(sql: &str) -> Result<Conversion> {
    Converter::default().convert(sql, &[])
}
