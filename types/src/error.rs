//! Errors raised while parsing the textual forms of the core types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
