//! Textual foreign-key pre-splitter for CREATE TABLE.
//!
//! DM rejects foreign keys declared inside the CREATE body the way
//! MySQL dumps emit them, so before parsing, any line containing
//! `CONSTRAINT` or `FOREIGN KEY` (case-insensitively) is lifted out of
//! the statement. The converter later wraps each retained line into an
//! `alter table ... add ...;` follow-up.
//!
//! This is a line-based pass by construction: it assumes dump-style
//! formatting where each constraint sits on its own line. Constraints
//! that share a line with a column definition are left for the parser
//! to skip.

use crate::parser::strip_leading_comments;

/// Split foreign-key and constraint lines out of a CREATE TABLE
/// statement. Returns the cleaned statement and the lifted lines,
/// trimmed of indentation and any trailing comma. Non-CREATE statements
/// pass through untouched.
pub fn split_foreign_keys(sql: &str) -> (String, Vec<String>) {
    let trimmed = strip_leading_comments(sql);
    let first_word: String = trimmed
        .chars()
        .skip_while(|c| !c.is_alphabetic())
        .take_while(|c| c.is_alphabetic())
        .collect();
    if !first_word.eq_ignore_ascii_case("create") {
        return (sql.to_string(), Vec::new());
    }

    let mut kept: Vec<String> = Vec::new();
    let mut fks: Vec<String> = Vec::new();
    for line in sql.split('\n') {
        let upper = line.to_ascii_uppercase();
        if upper.contains("CONSTRAINT") || upper.contains("FOREIGN KEY") {
            let fk = line.trim();
            let fk = fk.strip_suffix(',').unwrap_or(fk).trim_end();
            fks.push(fk.to_string());
        } else {
            kept.push(line.to_string());
        }
    }

    if fks.is_empty() {
        return (sql.to_string(), Vec::new());
    }

    // the last remaining column line may now carry a dangling comma
    if kept.len() >= 2 {
        let idx = kept.len() - 2;
        let stripped = kept[idx].trim_end().trim_end_matches(',').to_string();
        kept[idx] = stripped;
    }

    (kept.join("\n"), fks)
}
