//! Header override strategies
//!
//! A delay or abort fault may name a request header whose presence overrides
//! the configured value. The format of that header's value has never been
//! defined, so the mapping from header text to a duration or an abort code is
//! a pluggable strategy. When a strategy yields nothing the engine falls back
//! to the configured value.

use std::fmt::Debug;
use std::time::Duration;

use domain::AbortCode;

/// Maps an override header value to a fault value
pub trait HeaderOverride: Send + Sync + Debug {
    /// Delay to inject instead of the configured one
    fn delay_override(&self, value: &str) -> Option<Duration>;

    /// Abort code to return instead of the configured one
    fn abort_override(&self, value: &str) -> Option<AbortCode>;
}

/// Ignores override headers entirely
///
/// The configured delay or abort code is always used. This is the default
/// until a header format exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreOverride;

impl HeaderOverride for IgnoreOverride {
    fn delay_override(&self, _value: &str) -> Option<Duration> {
        None
    }

    fn abort_override(&self, _value: &str) -> Option<AbortCode> {
        None
    }
}

/// Passes abort header values through without interpreting them
///
/// The abort code becomes [`AbortCode::HeaderValue`] carrying the raw text
/// for the pipeline to interpret. Delay headers are ignored since no
/// duration format exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueOverride;

impl HeaderOverride for OpaqueOverride {
    fn delay_override(&self, _value: &str) -> Option<Duration> {
        None
    }

    fn abort_override(&self, value: &str) -> Option<AbortCode> {
        let value = value.trim();
        (!value.is_empty()).then(|| AbortCode::HeaderValue(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_yields_nothing() {
        assert_eq!(IgnoreOverride.delay_override("5s"), None);
        assert_eq!(IgnoreOverride.abort_override("503"), None);
    }

    #[test]
    fn opaque_passes_abort_value_through() {
        assert_eq!(
            OpaqueOverride.abort_override(" 503 "),
            Some(AbortCode::HeaderValue("503".to_string()))
        );
        assert_eq!(OpaqueOverride.abort_override(""), None);
        assert_eq!(OpaqueOverride.delay_override("5s"), None);
    }
}
