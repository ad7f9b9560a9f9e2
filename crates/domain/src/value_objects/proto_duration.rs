//! Signed duration in the protobuf JSON text form
//!
//! Fault configuration expresses delays the way `google.protobuf.Duration`
//! renders in JSON: a decimal number of seconds with at most nine fractional
//! digits and an `s` suffix (`"5s"`, `"0.250s"`, `"-1.5s"`). The value keeps
//! its sign so that negative durations survive parsing and can be rejected
//! with a descriptive error when the policy is validated.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use domain::value_objects::ProtoDuration;
//!
//! let d: ProtoDuration = "1.5s".parse().expect("valid duration");
//! assert_eq!(d.to_std(), Some(Duration::from_millis(1500)));
//! assert_eq!(d.to_string(), "1.500s");
//!
//! let negative: ProtoDuration = "-2s".parse().expect("valid duration");
//! assert!(negative.is_negative());
//! assert_eq!(negative.to_std(), None);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const MAX_FRACTION_DIGITS: usize = 9;

/// Signed seconds/nanoseconds pair, same range as `google.protobuf.Duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProtoDuration {
    seconds: i64,
    nanos: i32,
}

impl ProtoDuration {
    /// Largest magnitude in seconds (about 10,000 years)
    pub const MAX_SECONDS: i64 = 315_576_000_000;

    /// Create a duration from signed parts
    ///
    /// `seconds` and `nanos` must carry the same sign and `nanos` must be
    /// below one second in magnitude.
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, DomainError> {
        if !(-Self::MAX_SECONDS..=Self::MAX_SECONDS).contains(&seconds) {
            return Err(DomainError::InvalidDuration(format!(
                "{seconds}s exceeds the maximum of {}s",
                Self::MAX_SECONDS
            )));
        }
        if nanos.unsigned_abs() >= NANOS_PER_SECOND {
            return Err(DomainError::InvalidDuration(format!(
                "nanos {nanos} must be below one second"
            )));
        }
        if (seconds < 0 && nanos > 0) || (seconds > 0 && nanos < 0) {
            return Err(DomainError::InvalidDuration(format!(
                "seconds {seconds} and nanos {nanos} have different signs"
            )));
        }
        Ok(Self { seconds, nanos })
    }

    /// Convert a non-negative standard duration, saturating at the maximum
    #[must_use]
    pub fn from_std(duration: Duration) -> Self {
        let seconds = i64::try_from(duration.as_secs())
            .unwrap_or(Self::MAX_SECONDS)
            .min(Self::MAX_SECONDS);
        let nanos = i32::try_from(duration.subsec_nanos()).unwrap_or(0);
        Self { seconds, nanos }
    }

    /// Whole seconds, signed
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Fractional nanoseconds, same sign as `seconds`
    #[must_use]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Whether the duration is below zero
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.seconds < 0 || self.nanos < 0
    }

    /// Convert to a standard duration, `None` when negative
    #[must_use]
    pub fn to_std(&self) -> Option<Duration> {
        if self.is_negative() {
            return None;
        }
        Some(Duration::new(
            self.seconds.unsigned_abs(),
            self.nanos.unsigned_abs(),
        ))
    }
}

impl From<Duration> for ProtoDuration {
    fn from(duration: Duration) -> Self {
        Self::from_std(duration)
    }
}

impl FromStr for ProtoDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            DomainError::InvalidDuration(format!("'{s}' (expected e.g. \"5s\" or \"0.25s\")"))
        };

        let text = s.trim();
        let body = text.strip_suffix('s').ok_or_else(invalid)?;
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || fraction.len() > MAX_FRACTION_DIGITS
            || (body.contains('.') && fraction.is_empty())
        {
            return Err(invalid());
        }

        let seconds: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let nanos: i32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}").parse().map_err(|_| invalid())?
        };

        if negative {
            Self::new(-seconds, -nanos)
        } else {
            Self::new(seconds, nanos)
        }
    }
}

impl fmt::Display for ProtoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let seconds = self.seconds.unsigned_abs();
        let nanos = self.nanos.unsigned_abs();

        if nanos == 0 {
            write!(f, "{sign}{seconds}s")
        } else if nanos % 1_000_000 == 0 {
            write!(f, "{sign}{seconds}.{:03}s", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            write!(f, "{sign}{seconds}.{:06}s", nanos / 1_000)
        } else {
            write!(f, "{sign}{seconds}.{nanos:09}s")
        }
    }
}

impl Serialize for ProtoDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProtoDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ProtoDuration {
        s.parse().unwrap()
    }

    #[test]
    fn parses_whole_seconds() {
        assert_eq!(parse("5s").to_std(), Some(Duration::from_secs(5)));
        assert_eq!(parse("0s").to_std(), Some(Duration::ZERO));
    }

    #[test]
    fn parses_fractions() {
        assert_eq!(parse("0.25s").to_std(), Some(Duration::from_millis(250)));
        assert_eq!(parse("1.000000001s").to_std(), Some(Duration::new(1, 1)));
        assert_eq!(parse(".5s").to_std(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn parses_negative_values() {
        let d = parse("-0.5s");
        assert!(d.is_negative());
        assert_eq!(d.seconds(), 0);
        assert_eq!(d.nanos(), -500_000_000);
        assert_eq!(d.to_std(), None);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["5", "5m", "s", "-s", "1.s", "1.0000000001s", "abc s", "1,5s", "+1s"] {
            assert!(text.parse::<ProtoDuration>().is_err(), "accepted {text}");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!("315576000001s".parse::<ProtoDuration>().is_err());
        assert!("315576000000s".parse::<ProtoDuration>().is_ok());
    }

    #[test]
    fn new_rejects_mixed_signs() {
        assert!(ProtoDuration::new(1, -1).is_err());
        assert!(ProtoDuration::new(-1, 1).is_err());
        assert!(ProtoDuration::new(0, -1).is_ok());
    }

    #[test]
    fn display_uses_shortest_fraction_group() {
        assert_eq!(parse("5s").to_string(), "5s");
        assert_eq!(parse("0.25s").to_string(), "0.250s");
        assert_eq!(parse("0.000250s").to_string(), "0.000250s");
        assert_eq!(parse("1.000000001s").to_string(), "1.000000001s");
        assert_eq!(parse("-0.5s").to_string(), "-0.500s");
    }

    #[test]
    fn from_std_keeps_subsecond_precision() {
        let d = ProtoDuration::from(Duration::from_micros(1_500_250));
        assert_eq!(d.seconds(), 1);
        assert_eq!(d.nanos(), 500_250_000);
    }

    #[test]
    fn serde_uses_text_form() {
        let d: ProtoDuration = serde_json::from_str("\"2.5s\"").unwrap();
        assert_eq!(d.to_std(), Some(Duration::from_millis(2500)));
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2.500s\"");

        let result: Result<ProtoDuration, _> = serde_json::from_str("\"2 seconds\"");
        assert!(result.is_err());
    }
}
