//! Candle bar width definitions.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ConfigError;

/// A validated candle bar width.
///
/// Buckets must tile an hour evenly: widths under one minute must divide
/// 60 seconds, and widths of a minute or more must be a whole number of
/// minutes that divides 60. Anything else is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    seconds: u32,
}

impl Timeframe {
    /// One-second bars.
    pub const S1: Self = Self { seconds: 1 };
    /// Thirty-second bars.
    pub const S30: Self = Self { seconds: 30 };
    /// One-minute bars.
    pub const M1: Self = Self { seconds: 60 };
    /// Five-minute bars.
    pub const M5: Self = Self { seconds: 300 };
    /// Fifteen-minute bars.
    pub const M15: Self = Self { seconds: 900 };
    /// Thirty-minute bars.
    pub const M30: Self = Self { seconds: 1800 };
    /// One-hour bars.
    pub const H1: Self = Self { seconds: 3600 };

    /// Creates a timeframe from a width in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedTimeframe`] for widths that do not
    /// tile an hour evenly.
    pub const fn from_seconds(seconds: i64) -> Result<Self, ConfigError> {
        let supported = match seconds {
            s if s < 1 || s > 3600 => false,
            s if s < 60 => 60 % s == 0,
            s => s % 60 == 0 && 60 % (s / 60) == 0,
        };
        if supported {
            Ok(Self {
                seconds: seconds as u32,
            })
        } else {
            Err(ConfigError::UnsupportedTimeframe { seconds })
        }
    }

    /// Creates a timeframe from a duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedTimeframe`] for sub-second
    /// fractions and widths that do not tile an hour evenly.
    pub fn from_duration(duration: TimeDelta) -> Result<Self, ConfigError> {
        if duration.subsec_nanos() != 0 {
            return Err(ConfigError::UnsupportedTimeframe {
                seconds: duration.num_seconds(),
            });
        }
        Self::from_seconds(duration.num_seconds())
    }

    /// Returns the width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Returns the width as a duration.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.seconds))
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.seconds % 3600 == 0 {
            write!(f, "h{}", self.seconds / 3600)
        } else if self.seconds >= 60 {
            write!(f, "m{}", self.seconds / 60)
        } else {
            write!(f, "s{}", self.seconds)
        }
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let invalid = || ConfigError::InvalidTimeframe(s.to_string());

        // Accepts both "m5" and "5m" forms.
        let (unit, digits) = if lower.starts_with(|c: char| c.is_ascii_alphabetic()) {
            (lower.chars().next().ok_or_else(invalid)?, &lower[1..])
        } else if lower.ends_with(|c: char| c.is_ascii_alphabetic()) {
            let (digits, unit) = lower.split_at(lower.len() - 1);
            (unit.chars().next().ok_or_else(invalid)?, digits)
        } else {
            return Err(invalid());
        };

        let step: i64 = digits.parse().map_err(|_| invalid())?;
        let seconds = match unit {
            's' => Some(step),
            'm' => step.checked_mul(60),
            'h' => step.checked_mul(3600),
            _ => None,
        };
        Self::from_seconds(seconds.ok_or_else(invalid)?)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.to_string()
    }
}
