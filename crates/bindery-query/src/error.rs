//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur when compiling or evaluating a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The expression could not be tokenized or parsed.
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A function call referenced an unknown function.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    InvalidArity {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A function argument had an unsupported type.
    #[error("function '{name}' expects {expected}, got {actual}")]
    InvalidType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl QueryError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
