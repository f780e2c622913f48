//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// A closed taxonomy so callers can branch on kind instead of string-matching
/// messages. All three are terminal, user-visible failures; nothing here is
/// retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or invalid required input. Always a caller bug.
    #[error("bad params: {0}")]
    BadParams(String),

    /// Valid input, but the operation cannot proceed (missing/deactivated
    /// account, downstream provider rejected the call).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Permission check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn bad_params(msg: impl Into<String>) -> Self {
        Self::BadParams(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
