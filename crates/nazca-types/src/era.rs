//! Calendar eras and accumulator attributes for threshold bars.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ConfigError;

/// Calendar window after which a threshold accumulator force-resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraLength {
    /// Reset on every new calendar date.
    Day,
    /// Reset on every new ISO week.
    Week,
    /// Reset on every new calendar month.
    Month,
    /// Reset on every new calendar quarter.
    Quarter,
    /// Reset on every new calendar year.
    Year,
}

impl EraLength {
    /// Returns true if `timestamp` falls in a later era than `era_start`.
    #[must_use]
    pub fn crossed(&self, era_start: DateTime<Utc>, timestamp: DateTime<Utc>) -> bool {
        match self {
            Self::Day => era_start.date_naive() != timestamp.date_naive(),
            Self::Week => era_start.iso_week() != timestamp.iso_week(),
            Self::Month => {
                (era_start.year(), era_start.month()) != (timestamp.year(), timestamp.month())
            }
            Self::Quarter => {
                (era_start.year(), era_start.month0() / 3)
                    != (timestamp.year(), timestamp.month0() / 3)
            }
            Self::Year => era_start.year() != timestamp.year(),
        }
    }

    /// Returns the era length as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Returns all era lengths.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Day, Self::Week, Self::Month, Self::Quarter, Self::Year]
    }
}

impl std::fmt::Display for EraLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EraLength {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Self::Day),
            "w" | "week" | "weekly" => Ok(Self::Week),
            "m" | "month" | "monthly" => Ok(Self::Month),
            "q" | "quarter" | "quarterly" => Ok(Self::Quarter),
            "y" | "year" | "yearly" => Ok(Self::Year),
            _ => Err(ConfigError::InvalidEraLength(s.to_string())),
        }
    }
}

/// Sample attribute accumulated toward a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdAttr {
    /// Base-currency amount.
    Notional,
    /// Quote-currency amount.
    Volume,
    /// Raw tick count.
    Ticks,
}

impl ThresholdAttr {
    /// Returns the attribute as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notional => "notional",
            Self::Volume => "volume",
            Self::Ticks => "ticks",
        }
    }
}

impl std::fmt::Display for ThresholdAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThresholdAttr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notional" => Ok(Self::Notional),
            "volume" => Ok(Self::Volume),
            "ticks" => Ok(Self::Ticks),
            _ => Err(ConfigError::InvalidThresholdAttr(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_day_crossing() {
        assert!(EraLength::Day.crossed(at(2024, 1, 1), at(2024, 1, 2)));
        assert!(!EraLength::Day.crossed(at(2024, 1, 1), at(2024, 1, 1)));
    }

    #[test]
    fn test_week_crossing() {
        // 2024-01-07 is a Sunday, 2024-01-08 the following Monday.
        assert!(EraLength::Week.crossed(at(2024, 1, 7), at(2024, 1, 8)));
        assert!(!EraLength::Week.crossed(at(2024, 1, 8), at(2024, 1, 14)));
    }

    #[test]
    fn test_month_crossing() {
        assert!(EraLength::Month.crossed(at(2024, 1, 31), at(2024, 2, 1)));
        assert!(!EraLength::Month.crossed(at(2024, 1, 1), at(2024, 1, 31)));
    }

    #[test]
    fn test_quarter_crossing() {
        assert!(EraLength::Quarter.crossed(at(2024, 3, 31), at(2024, 4, 1)));
        assert!(!EraLength::Quarter.crossed(at(2024, 1, 1), at(2024, 3, 31)));
        assert!(EraLength::Quarter.crossed(at(2023, 12, 31), at(2024, 1, 1)));
    }

    #[test]
    fn test_year_crossing() {
        assert!(EraLength::Year.crossed(at(2023, 12, 31), at(2024, 1, 1)));
        assert!(!EraLength::Year.crossed(at(2024, 1, 1), at(2024, 12, 31)));
    }

    #[test]
    fn test_era_length_parse() {
        assert_eq!("M".parse::<EraLength>().unwrap(), EraLength::Month);
        assert_eq!("weekly".parse::<EraLength>().unwrap(), EraLength::Week);
        assert!("decade".parse::<EraLength>().is_err());
    }

    #[test]
    fn test_threshold_attr_parse() {
        assert_eq!(
            "notional".parse::<ThresholdAttr>().unwrap(),
            ThresholdAttr::Notional
        );
        assert!("slippage".parse::<ThresholdAttr>().is_err());
    }
}
