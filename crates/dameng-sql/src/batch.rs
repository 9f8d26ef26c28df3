//! Batch script splitting.
//!
//! Drivers feed the converter one statement at a time. A dump script is
//! split textually on `;`; within each piece, lines that open with `/`
//! (block-comment head) or `-` (line comment) are dropped. The split is
//! plain text and does not honor semicolons inside string literals.

/// Split a SQL script into individual statements
pub fn split_script(script: &str) -> Vec<String> {
    script
        .split(';')
        .filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            let body: Vec<&str> = piece
                .lines()
                .filter(|line| {
                    let head = line.trim_start().chars().next();
                    !matches!(head, Some('/') | Some('-') | None)
                })
                .collect();
            if body.is_empty() {
                None
            } else {
                Some(body.join("\n"))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_semicolon() {
        let script = "select 1;\nselect 2;\n";
        assert_eq!(split_script(script), vec!["select 1", "select 2"]);
    }

    #[test]
    fn test_skips_comment_lines() {
        let script = "-- dump header\nselect 1;\n/* block */\nselect 2;";
        assert_eq!(split_script(script), vec!["select 1", "select 2"]);
    }

    #[test]
    fn test_comment_only_piece_dropped() {
        let script = "-- nothing here;\n-- still nothing;";
        assert!(split_script(script).is_empty());
    }

    #[test]
    fn test_multiline_statement_kept_together() {
        let script = "CREATE TABLE t (\n  a int\n);";
        assert_eq!(split_script(script), vec!["CREATE TABLE t (\n  a int\n)"]);
    }
}
