//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Fault policy of a named route failed validation
    #[error("Route '{route}': {source}")]
    InvalidRoute {
        route: String,
        #[source]
        source: DomainError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Create an invalid route error
    pub fn invalid_route(route: impl Into<String>, source: DomainError) -> Self {
        Self::InvalidRoute {
            route: route.into(),
            source,
        }
    }

    /// Check if this error comes from an invalid fault policy
    pub const fn is_invalid_policy(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::InvalidPolicy(_))
                | Self::InvalidRoute {
                    source: DomainError::InvalidPolicy(_),
                    ..
                }
        )
    }
}
