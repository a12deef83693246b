use thiserror::Error;

/// Why one serialized line could not be turned into a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("empty transaction id")]
    EmptyId,

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] volt_types::TypesError),

    #[error("{field} is not a bracketed list: {value:?}")]
    UnbracketedList { field: &'static str, value: String },
}
