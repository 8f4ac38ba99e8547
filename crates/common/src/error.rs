//! Error types for loanform

use thiserror::Error;

/// Result type alias using the loanform Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when building or computing values.
///
/// Validators do not use this type: a rejected candidate is a
/// classification, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Empty digit string")]
    EmptyInput,

    #[error("Invalid input: {found:?} at position {position} is not a decimal digit")]
    InvalidInput { position: usize, found: char },

    #[error("Invalid birth date: {0}")]
    InvalidBirthDate(String),

    #[error("Invalid sequence number {0}: must be at most 999")]
    InvalidSequence(u16),

    #[error("Invalid mobile suffix {0:?}: must be exactly two digits")]
    InvalidSuffix(String),

    #[error("Invalid email provider {0:?}")]
    InvalidProvider(String),
}
