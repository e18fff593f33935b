use thiserror::Error;

/// Errors produced while parsing pointers and paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("json pointer must be empty or start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("invalid escape sequence in json pointer token: {0:?}")]
    InvalidEscape(String),

    #[error("unexpected token {token:?} at position {position} in schema pointer {pointer:?}")]
    UnexpectedToken {
        pointer: String,
        token: String,
        position: usize,
    },

    #[error("schema pointer ends without a property name: {0:?}")]
    MissingPropertyName(String),
}
