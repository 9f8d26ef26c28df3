//! Token types and tokenization for MySQL statements
//!
//! The tokenizer converts a SQL string into a token stream the parser
//! consumes. Lexical rules follow MySQL: backtick-quoted identifiers,
//! single- and double-quoted string literals with backslash escapes,
//! `--`, `#` and `/* */` comments, and `?` / `:name` bind markers.
//!
//! String and identifier tokens keep the *raw* inner text so the
//! generator can re-render literals exactly as they were written; escape
//! sequences are skipped over, never decoded.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a position in the source SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// A token in the SQL token stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// The raw text of the token (quotes stripped for quoted tokens)
    pub text: String,
    /// Position information
    pub span: Span,
    /// Block comments that appeared before this token
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>, span: Span) -> Self {
        Self {
            token_type,
            text: text.into(),
            span,
            comments: Vec::new(),
        }
    }

    /// Case-insensitive keyword test. Only bare identifiers are keywords;
    /// a backtick-quoted identifier never matches.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Identifier && self.text.eq_ignore_ascii_case(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.text)
    }
}

/// All token types produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Punctuation
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,

    // Operators
    Star,
    Plus,
    Dash,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    ShiftLeft,
    ShiftRight,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    NullSafeEq,

    // Literals and names
    Identifier,
    QuotedIdentifier,
    String,
    Number,
    HexNumber,
    /// `?` or `:name` bind marker
    Placeholder,
}

/// Tokenizer for MySQL-flavored SQL
#[derive(Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a SQL string
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>> {
        let mut state = TokenizerState::new(sql);
        state.tokenize()
    }
}

/// Internal state for tokenization
struct TokenizerState {
    /// (byte offset, char) pairs of the input
    chars: Vec<(usize, char)>,
    /// Total byte length of the input
    byte_len: usize,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    /// Block comments waiting to be attached to the next token
    comments: Vec<String>,
}

impl TokenizerState {
    fn new(sql: &str) -> Self {
        Self {
            chars: sql.char_indices().collect(),
            byte_len: sql.len(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            comments: Vec::new(),
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.skip_whitespace()?;
            if self.is_at_end() {
                break;
            }
            self.start = self.current;
            self.scan_token()?;
        }
        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current].1
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.current + 1].1
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        if char_index >= self.chars.len() {
            self.byte_len
        } else {
            self.chars[char_index].0
        }
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '-' if self.peek_next() == '-' => self.scan_line_comment(),
                '#' => self.scan_line_comment(),
                '/' if self.peek_next() == '*' => self.scan_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn scan_block_comment(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        self.advance(); // /
        self.advance(); // *
        let content_start = self.current;
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                let content: String = self.text_between(content_start, self.current);
                self.advance();
                self.advance();
                self.comments.push(format!("/*{}*/", content));
                return Ok(());
            }
            self.advance();
        }
        Err(Error::tokenize("Unterminated block comment", line, column))
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().map(|(_, c)| c).collect()
    }

    fn add_token(&mut self, token_type: TokenType, text: String) {
        let span = Span::new(
            self.byte_offset(self.start),
            self.byte_offset(self.current),
            self.line,
            self.column,
        );
        let mut token = Token::new(token_type, text, span);
        token.comments = std::mem::take(&mut self.comments);
        self.tokens.push(token);
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LParen, "(".into()),
            ')' => self.add_token(TokenType::RParen, ")".into()),
            ',' => self.add_token(TokenType::Comma, ",".into()),
            ';' => self.add_token(TokenType::Semicolon, ";".into()),
            '*' => self.add_token(TokenType::Star, "*".into()),
            '+' => self.add_token(TokenType::Plus, "+".into()),
            '-' => self.add_token(TokenType::Dash, "-".into()),
            '/' => self.add_token(TokenType::Slash, "/".into()),
            '%' => self.add_token(TokenType::Percent, "%".into()),
            '&' => self.add_token(TokenType::Amp, "&".into()),
            '|' => self.add_token(TokenType::Pipe, "|".into()),
            '^' => self.add_token(TokenType::Caret, "^".into()),
            '~' => self.add_token(TokenType::Tilde, "~".into()),
            '.' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number(c)?;
                } else {
                    self.add_token(TokenType::Dot, ".".into());
                }
            }
            '=' => self.add_token(TokenType::Eq, "=".into()),
            '!' => {
                if self.peek() == '=' {
                    self.advance();
                    self.add_token(TokenType::Neq, "!=".into());
                } else {
                    self.add_token(TokenType::Bang, "!".into());
                }
            }
            '<' => match self.peek() {
                '=' => {
                    self.advance();
                    if self.peek() == '>' {
                        self.advance();
                        self.add_token(TokenType::NullSafeEq, "<=>".into());
                    } else {
                        self.add_token(TokenType::Lte, "<=".into());
                    }
                }
                '>' => {
                    self.advance();
                    self.add_token(TokenType::Neq, "!=".into());
                }
                '<' => {
                    self.advance();
                    self.add_token(TokenType::ShiftLeft, "<<".into());
                }
                _ => self.add_token(TokenType::Lt, "<".into()),
            },
            '>' => match self.peek() {
                '=' => {
                    self.advance();
                    self.add_token(TokenType::Gte, ">=".into());
                }
                '>' => {
                    self.advance();
                    self.add_token(TokenType::ShiftRight, ">>".into());
                }
                _ => self.add_token(TokenType::Gt, ">".into()),
            },
            '`' => self.scan_quoted_identifier()?,
            '\'' | '"' => self.scan_string(c)?,
            '?' => self.add_token(TokenType::Placeholder, "?".into()),
            ':' => self.scan_named_placeholder()?,
            c if c.is_ascii_digit() => self.scan_number(c)?,
            c if is_identifier_start(c) => self.scan_identifier(),
            other => {
                return Err(Error::tokenize(
                    format!("Unexpected character '{}'", other),
                    self.line,
                    self.column,
                ))
            }
        }
        Ok(())
    }

    fn scan_quoted_identifier(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        loop {
            if self.is_at_end() {
                return Err(Error::tokenize("Unterminated identifier", line, column));
            }
            let c = self.advance();
            if c == '`' {
                // doubled backtick is a literal backtick
                if self.peek() == '`' {
                    self.advance();
                    text.push('`');
                } else {
                    break;
                }
            } else {
                text.push(c);
            }
        }
        self.add_token(TokenType::QuotedIdentifier, text);
        Ok(())
    }

    fn scan_string(&mut self, quote: char) -> Result<()> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        loop {
            if self.is_at_end() {
                return Err(Error::tokenize("Unterminated string literal", line, column));
            }
            let c = self.advance();
            if c == '\\' {
                // keep the escape sequence raw
                text.push(c);
                if !self.is_at_end() {
                    text.push(self.advance());
                }
            } else if c == quote {
                if self.peek() == quote {
                    self.advance();
                    text.push(c);
                    text.push(c);
                } else {
                    break;
                }
            } else {
                text.push(c);
            }
        }
        self.add_token(TokenType::String, text);
        Ok(())
    }

    fn scan_named_placeholder(&mut self) -> Result<()> {
        if !is_identifier_part(self.peek()) {
            return Err(Error::tokenize(
                "Expected bind variable name after ':'",
                self.line,
                self.column,
            ));
        }
        let mut text = String::from(":");
        while is_identifier_part(self.peek()) {
            text.push(self.advance());
        }
        self.add_token(TokenType::Placeholder, text);
        Ok(())
    }

    fn scan_number(&mut self, first: char) -> Result<()> {
        let mut text = String::new();
        text.push(first);

        // hex literal
        if first == '0' && (self.peek() == 'x' || self.peek() == 'X') {
            text.push(self.advance());
            while self.peek().is_ascii_hexdigit() {
                text.push(self.advance());
            }
            self.add_token(TokenType::HexNumber, text);
            return Ok(());
        }

        while self.peek().is_ascii_digit() {
            text.push(self.advance());
        }
        if self.peek() == '.' && first != '.' {
            text.push(self.advance());
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }
        if (self.peek() == 'e' || self.peek() == 'E') && self.exponent_follows() {
            text.push(self.advance());
            if self.peek() == '+' || self.peek() == '-' {
                text.push(self.advance());
            }
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }
        self.add_token(TokenType::Number, text);
        Ok(())
    }

    fn exponent_follows(&self) -> bool {
        let mut i = self.current + 1;
        if i < self.chars.len() && matches!(self.chars[i].1, '+' | '-') {
            i += 1;
        }
        i < self.chars.len() && self.chars[i].1.is_ascii_digit()
    }

    fn scan_identifier(&mut self) {
        let mut text = String::new();
        text.push(self.chars[self.start].1);
        while is_identifier_part(self.peek()) {
            text.push(self.advance());
        }
        self.add_token(TokenType::Identifier, text);
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(sql: &str) -> Vec<Token> {
        Tokenizer::new().tokenize(sql).expect("tokenize failed")
    }

    #[test]
    fn test_basic_select() {
        let tokens = tokenize("select a, b from t where a = 1");
        let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Comma,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Eq,
                TokenType::Number,
            ]
        );
    }

    #[test]
    fn test_backtick_identifier() {
        let tokens = tokenize("`live_channel`");
        assert_eq!(tokens[0].token_type, TokenType::QuotedIdentifier);
        assert_eq!(tokens[0].text, "live_channel");
    }

    #[test]
    fn test_string_keeps_raw_escapes() {
        let tokens = tokenize(r"'it\'s'");
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].text, r"it\'s");
    }

    #[test]
    fn test_doubled_quote_kept_raw() {
        let tokens = tokenize("'it''s'");
        assert_eq!(tokens[0].text, "it''s");
    }

    #[test]
    fn test_placeholders() {
        let tokens = tokenize("? :v3 :name");
        assert!(tokens.iter().all(|t| t.token_type == TokenType::Placeholder));
        assert_eq!(tokens[0].text, "?");
        assert_eq!(tokens[1].text, ":v3");
        assert_eq!(tokens[2].text, ":name");
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("<= >= != <> <=> << >>");
        let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Lte,
                TokenType::Gte,
                TokenType::Neq,
                TokenType::Neq,
                TokenType::NullSafeEq,
                TokenType::ShiftLeft,
                TokenType::ShiftRight,
            ]
        );
    }

    #[test]
    fn test_comments_attach_to_next_token() {
        let tokens = tokenize("insert /* keep me */ into t");
        assert_eq!(tokens[1].text, "into");
        assert_eq!(tokens[1].comments, vec!["/* keep me */".to_string()]);
    }

    #[test]
    fn test_line_comments_skipped() {
        let tokens = tokenize("-- leading\nselect 1 # trailing");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_keyword("select"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Tokenizer::new().tokenize("'oops").unwrap_err();
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let sql = "select `名字` from t";
        let tokens = tokenize(sql);
        let from = &tokens[2];
        assert!(from.is_keyword("from"));
        assert_eq!(&sql[from.span.start..from.span.end], "from");
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("1 1.5 0x1f 1693815665867");
        assert_eq!(tokens[0].token_type, TokenType::Number);
        assert_eq!(tokens[1].token_type, TokenType::Number);
        assert_eq!(tokens[2].token_type, TokenType::HexNumber);
        assert_eq!(tokens[3].text, "1693815665867");
    }
}
