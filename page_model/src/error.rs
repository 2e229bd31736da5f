//! Errors raised while interpreting authored vocabulary.

use thiserror::Error;

/// Authored content that does not fit the page vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown input kind '{0}'")]
    UnknownInputKind(String),

    #[error("unknown advance trigger '{0}'")]
    UnknownAdvanceTrigger(String),

    #[error("unknown comparator '{0}'")]
    UnknownComparator(String),

    #[error("malformed visibility condition '{0}'")]
    InvalidCondition(String),

    #[error("unknown position '{0}', expected 'before' or 'after'")]
    UnknownPosition(String),

    #[error("'{value}' is not a valid {field}")]
    InvalidNumber { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
