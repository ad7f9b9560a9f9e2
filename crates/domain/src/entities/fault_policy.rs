//! Fault policy for a route
//!
//! Built once from configuration, immutable afterwards and safe to share
//! across threads.

use serde::Serialize;

use super::{AbortSpec, DelaySpec};

/// Delay and/or abort faults applied to the requests of one route
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaultPolicy {
    /// Latency injection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelaySpec>,

    /// Error injection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort: Option<AbortSpec>,
}

impl FaultPolicy {
    /// Policy that lets every request through
    pub const fn none() -> Self {
        Self {
            delay: None,
            abort: None,
        }
    }

    /// Policy with only a delay fault
    pub const fn delay(delay: DelaySpec) -> Self {
        Self {
            delay: Some(delay),
            abort: None,
        }
    }

    /// Policy with only an abort fault
    pub const fn abort(abort: AbortSpec) -> Self {
        Self {
            delay: None,
            abort: Some(abort),
        }
    }

    /// Set the delay fault
    #[must_use]
    pub fn with_delay(mut self, delay: DelaySpec) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the abort fault
    #[must_use]
    pub fn with_abort(mut self, abort: AbortSpec) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Whether the policy can never inject anything
    ///
    /// True when neither fault is present or the present ones have no
    /// configured value and no override header.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        let delay_inert = self
            .delay
            .as_ref()
            .is_none_or(|d| d.kind.is_none() && d.override_header_name.is_none());
        let abort_inert = self
            .abort
            .as_ref()
            .is_none_or(|a| a.code.is_none() && a.override_header_name.is_none());
        delay_inert && abort_inert
    }
}
