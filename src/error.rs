//! Error types for Valley.

use thiserror::Error;

/// Common error type for Valley.
#[derive(Error, Debug)]
pub enum ValleyError {
    /// The requested board does not exist or has been soft-deleted.
    #[error("board not found")]
    BoardNotFound,

    /// The requested user does not exist or is not active.
    #[error("user not found")]
    UserNotFound,

    /// The requested clone does not exist.
    #[error("clone not found")]
    CloneNotFound,

    /// No subscription record exists for the given (clone, board) pair.
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// The subscription for the given pair is already active.
    #[error("subscription is already active")]
    AlreadyActive,

    /// Validation error for caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage error.
    ///
    /// This is a generic storage error that wraps errors from any database
    /// backend. Errors from sqlx are automatically converted. Unlike the
    /// domain errors above, a storage error is transient: the caller may
    /// retry the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ValleyError {
    /// Whether a caller may retry the failed operation.
    ///
    /// Only storage failures are retryable; domain errors are terminal
    /// for the current request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ValleyError::Storage(_))
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ValleyError {
    fn from(e: sqlx::Error) -> Self {
        ValleyError::Storage(e.to_string())
    }
}

/// Result type alias for Valley operations.
pub type Result<T> = std::result::Result<T, ValleyError>;
