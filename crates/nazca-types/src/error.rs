//! Error types shared by the aggregation and runner crates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Invalid builder configuration, rejected before any sample is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Bar width does not tile an hour evenly.
    #[error("unsupported timeframe width of {seconds}s: must divide 60s or be a whole number of minutes dividing 60")]
    UnsupportedTimeframe {
        /// The rejected width in seconds.
        seconds: i64,
    },

    /// Timeframe string could not be parsed.
    #[error("invalid timeframe '{0}', expected forms like '30s', 'm5', '1h'")]
    InvalidTimeframe(String),

    /// Renko box size must be positive.
    #[error("box size must be positive, got {box_size}")]
    InvalidBoxSize {
        /// The rejected box size.
        box_size: Decimal,
    },

    /// Renko reversal multiplier must be at least one box.
    #[error("reversal must be at least 1, got {reversal}")]
    InvalidReversal {
        /// The rejected reversal multiplier.
        reversal: u32,
    },

    /// Threshold value must be positive.
    #[error("threshold must be positive, got {threshold}")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: Decimal,
    },

    /// Era length string could not be parsed.
    #[error("invalid era length '{0}', expected one of: day, week, month, quarter, year")]
    InvalidEraLength(String),

    /// Threshold attribute string could not be parsed.
    #[error("invalid threshold attribute '{0}', expected one of: notional, volume, ticks")]
    InvalidThresholdAttr(String),
}

/// Internal defect detected during processing.
///
/// These abort the partition rather than silently produce bad bars: they
/// indicate either a bug in the algorithm or inputs that violate the
/// pre-sorted single-instrument contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A renko breakout failed to strictly change level.
    #[error("renko breakout at {timestamp} left level unchanged at {level} (price {price})")]
    LevelUnchanged {
        /// The unchanged level.
        level: Decimal,
        /// The breakout price.
        price: Decimal,
        /// Timestamp of the offending sample.
        timestamp: DateTime<Utc>,
    },

    /// The current level fell outside its own breakout bounds.
    #[error("renko level {level} outside bounds [{low}, {high}]")]
    LevelOutOfBounds {
        /// The level being checked.
        level: Decimal,
        /// Lower breakout bound.
        low: Decimal,
        /// Upper breakout bound.
        high: Decimal,
    },

    /// Breakout bounds lost their expected width.
    #[error("renko bounds [{low}, {high}] do not span {expected} for box size {box_size}")]
    AsymmetricBounds {
        /// Lower breakout bound.
        low: Decimal,
        /// Upper breakout bound.
        high: Decimal,
        /// Expected high-low span.
        expected: Decimal,
        /// Configured box size.
        box_size: Decimal,
    },

    /// A candle batch mixed more than one instrument.
    #[error("mixed symbols in batch: {first:?} and {second:?}")]
    MixedSymbols {
        /// Symbol of the batch's first sample.
        first: Option<String>,
        /// The conflicting symbol.
        second: Option<String>,
    },
}
