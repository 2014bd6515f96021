//! # Error Handling
//!
//! Error types shared by all Shiori components.
//!
//! Backend failures are never retried inside the index; they propagate to
//! the caller, which decides whether to recover or rebuild. Missing names
//! on delete and duplicate names on insert are silent no-ops, not errors.

use thiserror::Error;

/// Result type alias for Shiori operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for Shiori
#[derive(Error, Debug)]
pub enum Error {
    // Backend errors
    #[error("skip list error: {message}")]
    SkipList { message: String },

    #[error("sorted set store error: {message}")]
    Store { message: String },

    // Defensive only: a reachable node with no batch minimum, an entry that
    // vanished mid-operation, and similar states that indicate a bug.
    #[error("invariant violation: {details}")]
    InvariantViolation { details: String },

    // Caller errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("invalid name: {message}")]
    InvalidName { message: String },
}

impl Error {
    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::SkipList { .. } => true,
            Error::Store { .. } => true,
            Error::InvariantViolation { .. } => false,
            Error::Configuration { .. } => false,
            Error::InvalidName { .. } => false,
        }
    }

    /// Get error code for monitoring
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::SkipList { .. } => "SKIPLIST_ERROR",
            Error::Store { .. } => "STORE_ERROR",
            Error::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            Error::Configuration { .. } => "CONFIG_ERROR",
            Error::InvalidName { .. } => "INVALID_NAME",
        }
    }

    /// Shorthand for an invariant violation
    pub fn invariant(details: impl Into<String>) -> Self {
        Error::InvariantViolation {
            details: details.into(),
        }
    }
}
