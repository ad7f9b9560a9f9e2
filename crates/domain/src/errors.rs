//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Fault policy failed validation
    #[error("Invalid fault policy: {0}")]
    InvalidPolicy(String),

    /// Duration text could not be parsed
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

impl DomainError {
    /// Create an invalid policy error scoped to a configuration field
    pub fn invalid_policy(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidPolicy(format!("{field}: {reason}"))
    }
}
