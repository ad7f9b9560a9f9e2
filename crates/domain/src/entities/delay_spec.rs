//! Delay fault specification
//!
//! Injects latency into the request forwarding path. With `percent` unset
//! every eligible request is delayed.

use std::time::Duration;

use serde::Serialize;

use crate::value_objects::Percent;

/// How the injected delay is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayKind {
    /// Always the same delay
    Fixed(Duration),
    /// Exponentially distributed delay with the given mean
    Exponential {
        /// Mean of the distribution
        mean: Duration,
    },
}

/// Validated delay specification
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DelaySpec {
    /// Share of requests to delay; `None` means all of them
    pub percent: Option<Percent>,

    /// Configured delay; `None` makes the delay a no-op
    pub kind: Option<DelayKind>,

    /// Request header whose presence overrides the configured delay
    pub override_header_name: Option<String>,
}

impl DelaySpec {
    /// Delay every selected request by a fixed duration
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            percent: None,
            kind: Some(DelayKind::Fixed(delay)),
            override_header_name: None,
        }
    }

    /// Delay every selected request by an exponentially distributed duration
    pub const fn exponential(mean: Duration) -> Self {
        Self {
            percent: None,
            kind: Some(DelayKind::Exponential { mean }),
            override_header_name: None,
        }
    }

    /// Set the share of requests to delay
    #[must_use]
    pub const fn with_percent(mut self, percent: Percent) -> Self {
        self.percent = Some(percent);
        self
    }

    /// Set the override header name
    #[must_use]
    pub fn with_override_header(mut self, name: impl Into<String>) -> Self {
        self.override_header_name = Some(name.into());
        self
    }

    /// Selection percentage, resolving an unset value to 100
    #[must_use]
    pub fn effective_percent(&self) -> Percent {
        self.percent.unwrap_or(Percent::ALWAYS)
    }

    /// Override header name, if one is configured
    #[must_use]
    pub fn override_header(&self) -> Option<&str> {
        self.override_header_name.as_deref()
    }
}
