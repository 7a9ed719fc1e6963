//! Shared error taxonomy.

use thiserror::Error as ThisError;

/// Result type used across the domain, store and service layers.
pub type Result<T> = std::result::Result<T, Error>;

/// The single error taxonomy surfaced to callers.
///
/// Keep this focused on deterministic, machine-distinguishable failures.
/// Nothing is silently swallowed: every operation either succeeds or returns
/// one of these kinds with a human-readable message.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or missing required input (non-positive quantity, empty
    /// item list, empty credential, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced identity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller lacks the required role/flag, or credentials did not match.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A status change not permitted from the current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A uniqueness violation (duplicate barcode/name/email) or a lost
    /// optimistic-concurrency race.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected store failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Machine-readable kind tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}
