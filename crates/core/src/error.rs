//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, user-facing failures. Persistence
/// failures are an infrastructure concern and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request carries no identity bound to a known user.
    #[error("authentication required")]
    Unauthenticated,

    /// Registration with a username that is already taken.
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// Unknown username or empty credential.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A value failed validation (e.g. empty username).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn duplicate_user(username: impl Into<String>) -> Self {
        Self::DuplicateUser(username.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
