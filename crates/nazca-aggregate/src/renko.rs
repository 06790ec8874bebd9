//! Price-level breakout (renko) bars.

use chrono::{DateTime, Utc};
use nazca_types::{ConfigError, InvariantError, Partition};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BarKind, BarStats, Builder, Sample, TopNEntry, merge_top_n, select_top_n};

/// Direction of the last emitted renko bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Last level change was upward.
    Up,
    /// Last level change was downward.
    Down,
}

impl Direction {
    /// Classifies a non-zero level change.
    #[must_use]
    pub fn of_change(change: Decimal) -> Self {
        if change > Decimal::ZERO {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// One renko bar, emitted when price broke out of its level bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenkoBar {
    /// Instrument symbol, present only for multi-instrument tables.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// Timestamp of the breakout sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the breakout sample.
    pub nanoseconds: u32,
    /// Price of the breakout sample.
    pub price: Decimal,
    /// The new level: a whole multiple of the box size.
    pub level: Decimal,
    /// Level delta from the previous bar, never zero.
    pub change: Decimal,
    /// Summed amounts and tick counts since the previous breakout.
    #[serde(flatten)]
    pub stats: BarStats,
    /// Largest-notional samples since the previous breakout.
    pub top_n: Vec<TopNEntry>,
}

impl RenkoBar {
    /// Aggregates the non-empty run of samples that closed with a breakout.
    fn from_run(run: &[Sample], level: Decimal, change: Decimal, top_n: usize) -> Self {
        let last = &run[run.len() - 1];
        Self {
            symbol: last.symbol.clone(),
            timestamp: last.timestamp,
            nanoseconds: last.nanoseconds,
            price: last.price,
            level,
            change,
            stats: BarStats::from_samples(run),
            top_n: select_top_n(run, top_n),
        }
    }

    /// Folds a carried-over partial into this bar.
    fn absorb_previous(&mut self, previous: RenkoPartial, top_n: usize) {
        self.stats.merge(&previous.stats);
        self.top_n = merge_top_n(previous.top_n, std::mem::take(&mut self.top_n), top_n);
    }
}

/// The not-yet-closed suffix of a partition's samples.
///
/// Created when a partition ends between breakouts; folded into the first
/// bar the following partition emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenkoPartial {
    /// Timestamp of the suffix's last sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the suffix's last sample.
    pub nanoseconds: u32,
    /// Price of the suffix's last sample.
    pub price: Decimal,
    /// Summed amounts and tick counts over the suffix.
    #[serde(flatten)]
    pub stats: BarStats,
    /// Largest-notional samples over the suffix.
    pub top_n: Vec<TopNEntry>,
}

impl RenkoPartial {
    /// Aggregates a non-empty end-of-partition suffix.
    fn from_run(run: &[Sample], top_n: usize) -> Self {
        let last = &run[run.len() - 1];
        Self {
            timestamp: last.timestamp,
            nanoseconds: last.nanoseconds,
            price: last.price,
            stats: BarStats::from_samples(run),
            top_n: select_top_n(run, top_n),
        }
    }

    /// Extends this partial with the one carried from an earlier partition.
    fn absorb_previous(&mut self, previous: Self, top_n: usize) {
        self.stats.merge(&previous.stats);
        self.top_n = merge_top_n(previous.top_n, std::mem::take(&mut self.top_n), top_n);
    }
}

/// Carry-over state for renko aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenkoCache {
    /// Current level: a whole multiple of the box size.
    pub level: Decimal,
    /// Direction of the last emitted bar, unset until the first breakout.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direction: Option<Direction>,
    /// Partial bar carried into the next partition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_day: Option<RenkoPartial>,
}

/// Builds price-level breakout bars.
///
/// A bar closes whenever price escapes the asymmetric bounds around the
/// current level; the reversal multiplier widens the bound opposing the
/// last direction so single-box retracements do not flip the trend.
#[derive(Debug, Clone, Copy)]
pub struct RenkoBuilder {
    box_size: Decimal,
    reversal: u32,
    top_n: usize,
}

impl RenkoBuilder {
    /// Creates a renko builder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] unless `box_size` is positive and `reversal`
    /// is at least one box.
    pub fn new(box_size: Decimal, reversal: u32, top_n: usize) -> Result<Self, ConfigError> {
        if box_size <= Decimal::ZERO {
            return Err(ConfigError::InvalidBoxSize { box_size });
        }
        if reversal < 1 {
            return Err(ConfigError::InvalidReversal { reversal });
        }
        Ok(Self {
            box_size,
            reversal,
            top_n,
        })
    }

    /// Returns the configured box size.
    #[must_use]
    pub const fn box_size(&self) -> Decimal {
        self.box_size
    }

    /// Seeds the series' first cache from its first batch.
    ///
    /// The batch's first sample decides the initial level and is discarded;
    /// it is never part of an emitted bar.
    pub fn initial_cache(&self, samples: &mut Vec<Sample>) -> Option<RenkoCache> {
        if samples.is_empty() {
            return None;
        }
        let first = samples.remove(0);
        Some(RenkoCache {
            level: self.level_for(first.price),
            direction: None,
            next_day: None,
        })
    }

    /// Snaps a price to its level: `floor(price / box_size) * box_size`.
    fn level_for(&self, price: Decimal) -> Decimal {
        (price / self.box_size).floor() * self.box_size
    }

    /// Computes the `(high, low)` breakout bounds for the current state.
    fn bounds(&self, cache: &RenkoCache) -> (Decimal, Decimal) {
        let level = cache.level;
        let reversal = self.box_size * Decimal::from(self.reversal);
        match cache.direction {
            Some(Direction::Up) => (level + self.box_size, level - reversal),
            Some(Direction::Down) => (level + reversal, level - self.box_size),
            None => (level + self.box_size, level - self.box_size),
        }
    }

    /// Returns the new `(level, change)` if `price` escapes the bounds.
    ///
    /// Breaking below `low` with a non-zero remainder bumps the level one
    /// box upward, so a partial box downward still lands strictly below the
    /// old level.
    fn breakout(
        &self,
        level: Decimal,
        high: Decimal,
        low: Decimal,
        price: Decimal,
    ) -> Option<(Decimal, Decimal)> {
        let higher = price >= high;
        let lower = price < low;
        if !higher && !lower {
            return None;
        }
        let mut current = self.level_for(price);
        let mut change = current - level;
        if lower && price % self.box_size != Decimal::ZERO {
            current += self.box_size;
            change += self.box_size;
        }
        Some((current, change))
    }

    /// Builds renko bars over one partition's samples.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] when a breakout fails to change level or
    /// the bounds around the pre-breakout level lose their expected width.
    pub fn build(
        &self,
        samples: &[Sample],
        mut cache: RenkoCache,
    ) -> Result<(Vec<RenkoBar>, RenkoCache), InvariantError> {
        let mut bars = Vec::new();
        let mut start = 0;
        let (mut high, mut low) = self.bounds(&cache);
        for (index, sample) in samples.iter().enumerate() {
            let Some((level, change)) = self.breakout(cache.level, high, low, sample.price)
            else {
                continue;
            };
            self.check_emission(&cache, level, high, low, sample)?;
            let mut bar = RenkoBar::from_run(&samples[start..=index], level, change, self.top_n);
            if let Some(previous) = cache.next_day.take() {
                bar.absorb_previous(previous, self.top_n);
            }
            cache.level = level;
            cache.direction = Some(Direction::of_change(change));
            (high, low) = self.bounds(&cache);
            start = index + 1;
            bars.push(bar);
        }
        if start < samples.len() {
            let mut partial = RenkoPartial::from_run(&samples[start..], self.top_n);
            if let Some(previous) = cache.next_day.take() {
                partial.absorb_previous(previous, self.top_n);
            }
            cache.next_day = Some(partial);
        }
        Ok((bars, cache))
    }

    /// Checks the emission invariants against the pre-breakout state.
    fn check_emission(
        &self,
        cache: &RenkoCache,
        level: Decimal,
        high: Decimal,
        low: Decimal,
        sample: &Sample,
    ) -> Result<(), InvariantError> {
        if level == cache.level {
            return Err(InvariantError::LevelUnchanged {
                level,
                price: sample.price,
                timestamp: sample.timestamp,
            });
        }
        if low > cache.level || cache.level > high {
            return Err(InvariantError::LevelOutOfBounds {
                level: cache.level,
                low,
                high,
            });
        }
        let boxes = match cache.direction {
            Some(_) => Decimal::from(1 + self.reversal),
            None => Decimal::from(2),
        };
        let expected = self.box_size * boxes;
        if high - low != expected {
            return Err(InvariantError::AsymmetricBounds {
                low,
                high,
                expected,
                box_size: self.box_size,
            });
        }
        Ok(())
    }
}

impl Builder for RenkoBuilder {
    type Bar = RenkoBar;
    type Cache = RenkoCache;

    fn kind(&self) -> BarKind {
        BarKind::Renko
    }

    fn initial_cache(
        &self,
        samples: &mut Vec<Sample>,
        _partition: &Partition,
    ) -> Option<Self::Cache> {
        self.initial_cache(samples)
    }

    fn build(
        &self,
        samples: &[Sample],
        _partition: &Partition,
        cache: Self::Cache,
    ) -> Result<(Vec<Self::Bar>, Self::Cache), InvariantError> {
        self.build(samples, cache)
    }
}
