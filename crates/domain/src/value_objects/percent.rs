//! Percent value object
//!
//! Represents the share of eligible requests a fault applies to (0-100%).
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Percent;
//!
//! let p = Percent::new(12.5).expect("valid percent");
//! assert!((p.value() - 12.5).abs() < f64::EPSILON);
//!
//! // Out-of-range values return an error
//! assert!(Percent::new(100.5).is_err());
//! assert!(Percent::new(f64::NAN).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a percent value is out of range or not a number
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("invalid percent: {0} is out of range (must be 0-100)")]
pub struct InvalidPercent(f64);

/// Share of eligible requests, as a percentage in `[0, 100]`
///
/// A request is selected when a uniform draw `r` in `[0, 100)` satisfies
/// `r < percent`, so `0` never selects and `100` always selects.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percent(f64);

impl Percent {
    /// Minimum valid percentage
    pub const MIN: f64 = 0.0;

    /// Maximum valid percentage
    pub const MAX: f64 = 100.0;

    /// Never selects a request
    pub const NEVER: Self = Self(Self::MIN);

    /// Always selects a request; also the value an unset percent resolves to
    pub const ALWAYS: Self = Self(Self::MAX);

    /// Create a new validated percent value
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercent` if the value is NaN or outside `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::value_objects::Percent;
    ///
    /// assert!(Percent::new(0.0).is_ok());
    /// assert!(Percent::new(100.0).is_ok());
    /// assert!(Percent::new(-0.1).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, InvalidPercent> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPercent(value))
        }
    }

    /// Get the percentage as an `f64`
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Get the selection probability in `[0, 1]`
    #[must_use]
    pub fn ratio(self) -> f64 {
        self.0 / Self::MAX
    }

    /// Whether a draw in `[0, 100)` falls inside this percentage
    #[must_use]
    pub fn selects(self, draw: f64) -> bool {
        draw < self.0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<f64> for Percent {
    type Error = InvalidPercent;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for f64 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

/// Custom deserialization that validates the range
impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
