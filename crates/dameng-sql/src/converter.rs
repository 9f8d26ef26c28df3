//! Converter facade.
//!
//! [`Converter::convert`] orchestrates the whole pipeline: classify,
//! lift foreign keys, parse, rewrite, re-bind parameters, render, and
//! apply the final character substitutions. It is a value object over
//! three read-only catalog maps; concurrent calls on a shared converter
//! are safe because every call allocates its own AST and buffer.

use crate::batch::split_script;
use crate::catalog::CatalogHints;
use crate::error::{Error, Result};
use crate::expressions::{SqlVal, Statement, ValKind};
use crate::fk_split::split_foreign_keys;
use crate::generator::Generator;
use crate::parser::{parse, preview};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Single-pass text substitutions applied to every rendered statement:
/// MySQL quoting, the zero-date sentinel, and backslash-escaped quotes.
const REPLACE_CHARS: &[(&str, &str)] = &[
    ("`", "\""),
    ("0000-00-00 00:00:00", "0001-01-01 00:00:00"),
    (r"\'", "''"),
];

/// A positional bind argument carried alongside the SQL text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Int(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Str(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Str(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(v)
    }
}

/// The outcome of one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Lifted constraints, e.g. `alter table ... add constraint ...;`
    pub followups: Vec<String>,
    /// Exactly one element on success
    pub outputs: Vec<String>,
    /// The argument vector permuted to match renumbered placeholders
    pub args: Vec<BindValue>,
}

/// MySQL → DM statement converter
#[derive(Debug, Clone, Default)]
pub struct Converter {
    hints: CatalogHints,
}

impl Converter {
    pub fn new(hints: CatalogHints) -> Self {
        Self { hints }
    }

    /// Translate one statement. Unsupported statement kinds pass through
    /// verbatim with their arguments untouched.
    pub fn convert(&self, sql: &str, args: &[BindValue]) -> Result<Conversion> {
        if !preview(sql).convertible() {
            return Ok(Conversion {
                followups: Vec::new(),
                outputs: vec![sql.to_string()],
                args: args.to_vec(),
            });
        }

        let (cleaned, fk_lines) = split_foreign_keys(sql);
        let statement = match parse(&cleaned) {
            Ok(statement) => statement,
            Err(e) => {
                warn!(sql = %cleaned, error = %e, "failed to parse statement");
                return Err(e);
            }
        };

        let followups = build_followups(&statement, &fk_lines);

        let Some(mut rewritten) = crate::transforms::rewrite_statement(&self.hints, statement)?
        else {
            // no structural rewrite; emit the cleaned source text
            return Ok(Conversion {
                followups,
                outputs: vec![substitute(&cleaned)],
                args: args.to_vec(),
            });
        };

        let out_args = if !args.is_empty()
            && matches!(rewritten, Statement::Merge(_) | Statement::Insert(_))
        {
            rebind_args(&mut rewritten, args)?
        } else {
            args.to_vec()
        };

        let output = substitute(&Generator::sql(&rewritten));
        debug!(sql = %output, "converted statement");
        Ok(Conversion {
            followups,
            outputs: vec![output],
            args: out_args,
        })
    }

    /// Split a script on `;` and convert each statement in order
    pub fn convert_script(&self, script: &str) -> Result<Vec<Conversion>> {
        split_script(script)
            .iter()
            .map(|statement| self.convert(statement, &[]))
            .collect()
    }
}

fn build_followups(statement: &Statement, fk_lines: &[String]) -> Vec<String> {
    if fk_lines.is_empty() {
        return Vec::new();
    }
    let new_name = match statement {
        Statement::Ddl(ddl) => ddl.new_name.name.as_str(),
        _ => "",
    };
    fk_lines
        .iter()
        .map(|fk| format!("alter table `{}` add {};", new_name, fk))
        .collect()
}

/// Renumber `:vN` placeholders in visit order (which is render order)
/// and permute the argument vector to match (component G). Arguments
/// referenced twice are duplicated; arguments never referenced are
/// dropped. An out-of-range reference is an error, not a panic.
fn rebind_args(statement: &mut Statement, args: &[BindValue]) -> Result<Vec<BindValue>> {
    let mut out_args = Vec::with_capacity(args.len());
    let mut next_id = 1usize;
    let mut failure: Option<Error> = None;

    statement.walk_values_mut(&mut |val: &mut SqlVal| {
        if failure.is_some() || val.kind != ValKind::Placeholder {
            return;
        }
        let Some(ordinal) = placeholder_ordinal(&val.text) else {
            return;
        };
        if ordinal == 0 || ordinal > args.len() {
            failure = Some(Error::rebind(format!(
                "placeholder :v{} references argument {} of {}",
                ordinal,
                ordinal,
                args.len()
            )));
            return;
        }
        val.text = format!(":v{}", next_id);
        next_id += 1;
        out_args.push(args[ordinal - 1].clone());
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(out_args),
    }
}

/// Parse the N out of a `:vN` marker; `None` for named markers
fn placeholder_ordinal(text: &str) -> Option<usize> {
    let digits = text.strip_prefix(":v")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn substitute(sql: &str) -> String {
    let mut out = sql.to_string();
    for (from, to) in REPLACE_CHARS {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_ordinal() {
        assert_eq!(placeholder_ordinal(":v1"), Some(1));
        assert_eq!(placeholder_ordinal(":v42"), Some(42));
        assert_eq!(placeholder_ordinal(":name"), None);
        assert_eq!(placeholder_ordinal(":v"), None);
        assert_eq!(placeholder_ordinal(":v1x"), None);
        assert_eq!(placeholder_ordinal("?"), None);
    }

    #[test]
    fn test_substitute_table() {
        assert_eq!(substitute("`a` = '0000-00-00 00:00:00'"), "\"a\" = '0001-01-01 00:00:00'");
        assert_eq!(substitute(r"'it\'s'"), "'it''s'");
    }

    #[test]
    fn test_followups_use_parsed_table_name() {
        let statement = parse("create table `foo` (a int)").expect("parse");
        let followups = build_followups(
            &statement,
            &["CONSTRAINT fk_x FOREIGN KEY (y) REFERENCES z(w)".to_string()],
        );
        assert_eq!(
            followups,
            vec!["alter table `foo` add CONSTRAINT fk_x FOREIGN KEY (y) REFERENCES z(w);"]
        );
    }
}
