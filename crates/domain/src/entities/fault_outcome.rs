//! Per-request fault decision

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::AbortCode;

/// What the request pipeline must do with a request
///
/// Delay and abort are independent; when both apply the delay elapses first
/// and the abort is returned afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FaultOutcome {
    /// Forward the request untouched
    Pass,
    /// Hold the request for `duration`, then forward it
    Delay {
        /// Injected latency
        duration: Duration,
    },
    /// Respond immediately with `code`
    Abort {
        /// Error returned to the caller
        code: AbortCode,
    },
    /// Hold the request for `duration`, then respond with `code`
    DelayThenAbort {
        /// Injected latency
        duration: Duration,
        /// Error returned to the caller
        code: AbortCode,
    },
}

impl FaultOutcome {
    /// Combine independently evaluated delay and abort results
    #[must_use]
    pub fn from_parts(delay: Option<Duration>, abort: Option<AbortCode>) -> Self {
        match (delay, abort) {
            (None, None) => Self::Pass,
            (Some(duration), None) => Self::Delay { duration },
            (None, Some(code)) => Self::Abort { code },
            (Some(duration), Some(code)) => Self::DelayThenAbort { duration, code },
        }
    }

    /// Injected delay, if any
    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        match self {
            Self::Delay { duration } | Self::DelayThenAbort { duration, .. } => Some(*duration),
            Self::Pass | Self::Abort { .. } => None,
        }
    }

    /// Abort code, if any
    #[must_use]
    pub const fn abort(&self) -> Option<&AbortCode> {
        match self {
            Self::Abort { code } | Self::DelayThenAbort { code, .. } => Some(code),
            Self::Pass | Self::Delay { .. } => None,
        }
    }

    /// Whether the request is forwarded untouched
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for FaultOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Delay { duration } => write!(f, "delay {duration:?}"),
            Self::Abort { code } => write!(f, "abort ({code})"),
            Self::DelayThenAbort { duration, code } => {
                write!(f, "delay {duration:?} then abort ({code})")
            },
        }
    }
}
