//! Error types for dameng-sql

use thiserror::Error;

/// The result type for translation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating a statement
#[derive(Debug, Error)]
pub enum Error {
    /// Error during tokenization
    #[error("Tokenization error at line {line}, column {column}: {message}")]
    Tokenize {
        message: String,
        line: usize,
        column: usize,
    },

    /// Error during parsing
    #[error("Parse error: {0}")]
    Parse(String),

    /// The DDL path saw a column type outside the MySQL type table
    #[error("Unimplemented type: {0}")]
    UnimplementedType(String),

    /// A bind placeholder referenced a position outside the argument vector
    #[error("Rebind error: {0}")]
    Rebind(String),
}

impl Error {
    /// Create a tokenization error
    pub fn tokenize(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Tokenize {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Create a rebind error
    pub fn rebind(message: impl Into<String>) -> Self {
        Error::Rebind(message.into())
    }
}
