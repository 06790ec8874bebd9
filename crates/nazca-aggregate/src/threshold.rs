//! Accumulator-crossing (threshold) bars with calendar-era resets.

use chrono::{DateTime, Utc};
use nazca_types::{ConfigError, EraLength, InvariantError, Partition, ThresholdAttr};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BarKind, BarStats, Builder, Sample, TopNEntry, merge_top_n, select_top_n};

/// One threshold bar, closed when the running accumulator crossed the
/// configured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBar {
    /// Instrument symbol, present only for multi-instrument tables.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// Timestamp of the crossing sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the crossing sample.
    pub nanoseconds: u32,
    /// First price since the previous close.
    pub open: Decimal,
    /// Highest price since the previous close.
    pub high: Decimal,
    /// Lowest price since the previous close.
    pub low: Decimal,
    /// Price of the crossing sample.
    pub close: Decimal,
    /// The era-scoped accumulator value at emission time.
    pub accumulator: Decimal,
    /// Summed amounts and tick counts since the previous close.
    #[serde(flatten)]
    pub stats: BarStats,
    /// Largest-notional samples since the previous close.
    pub top_n: Vec<TopNEntry>,
}

impl ThresholdBar {
    /// Aggregates the non-empty run of samples that crossed the threshold.
    fn from_run(run: &[Sample], accumulator: Decimal, top_n: usize) -> Self {
        let first = &run[0];
        let last = &run[run.len() - 1];
        let mut high = first.price;
        let mut low = first.price;
        for sample in run {
            high = high.max(sample.price);
            low = low.min(sample.price);
        }
        Self {
            symbol: last.symbol.clone(),
            timestamp: last.timestamp,
            nanoseconds: last.nanoseconds,
            open: first.price,
            high,
            low,
            close: last.price,
            accumulator,
            stats: BarStats::from_samples(run),
            top_n: select_top_n(run, top_n),
        }
    }

    /// Folds a carried-over partial into this bar.
    fn absorb_previous(&mut self, previous: ThresholdPartial, top_n: usize) {
        self.open = previous.open;
        self.high = self.high.max(previous.high);
        self.low = self.low.min(previous.low);
        self.stats.merge(&previous.stats);
        self.top_n = merge_top_n(previous.top_n, std::mem::take(&mut self.top_n), top_n);
    }
}

/// The not-yet-closed suffix of a partition's samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPartial {
    /// Timestamp of the suffix's last sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the suffix's last sample.
    pub nanoseconds: u32,
    /// First price of the suffix.
    pub open: Decimal,
    /// Highest price of the suffix.
    pub high: Decimal,
    /// Lowest price of the suffix.
    pub low: Decimal,
    /// Last price of the suffix.
    pub close: Decimal,
    /// Summed amounts and tick counts over the suffix.
    #[serde(flatten)]
    pub stats: BarStats,
    /// Largest-notional samples over the suffix.
    pub top_n: Vec<TopNEntry>,
}

impl ThresholdPartial {
    /// Aggregates a non-empty end-of-partition suffix.
    fn from_run(run: &[Sample], top_n: usize) -> Self {
        let first = &run[0];
        let last = &run[run.len() - 1];
        let mut high = first.price;
        let mut low = first.price;
        for sample in run {
            high = high.max(sample.price);
            low = low.min(sample.price);
        }
        Self {
            timestamp: last.timestamp,
            nanoseconds: last.nanoseconds,
            open: first.price,
            high,
            low,
            close: last.price,
            stats: BarStats::from_samples(run),
            top_n: select_top_n(run, top_n),
        }
    }

    /// Extends this partial with the one carried from an earlier partition.
    fn absorb_previous(&mut self, previous: Self, top_n: usize) {
        self.open = previous.open;
        self.high = self.high.max(previous.high);
        self.low = self.low.min(previous.low);
        self.stats.merge(&previous.stats);
        self.top_n = merge_top_n(previous.top_n, std::mem::take(&mut self.top_n), top_n);
    }
}

/// Carry-over state for threshold aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCache {
    /// Start of the current accumulation era.
    pub era_start: DateTime<Utc>,
    /// Attribute sum since the last emitted bar.
    pub accumulator: Decimal,
    /// Partial bar carried into the next partition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_day: Option<ThresholdPartial>,
}

/// Builds accumulator-crossing bars.
///
/// The chosen attribute is summed sample by sample; crossing the threshold
/// closes a bar and zeroes the sum. Crossing a calendar era boundary
/// re-initializes the cache outright, discarding any pending partial, so
/// eras never bleed into each other.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdBuilder {
    attr: ThresholdAttr,
    threshold: Decimal,
    era_length: EraLength,
    top_n: usize,
}

impl ThresholdBuilder {
    /// Creates a threshold builder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] unless the threshold is
    /// positive.
    pub fn new(
        attr: ThresholdAttr,
        threshold: Decimal,
        era_length: EraLength,
        top_n: usize,
    ) -> Result<Self, ConfigError> {
        if threshold <= Decimal::ZERO {
            return Err(ConfigError::InvalidThreshold { threshold });
        }
        Ok(Self {
            attr,
            threshold,
            era_length,
            top_n,
        })
    }

    /// Returns the accumulated attribute.
    #[must_use]
    pub const fn attr(&self) -> ThresholdAttr {
        self.attr
    }

    /// Returns a zeroed cache opening an era at `era_start`.
    #[must_use]
    pub const fn initial_cache(&self, era_start: DateTime<Utc>) -> ThresholdCache {
        ThresholdCache {
            era_start,
            accumulator: Decimal::ZERO,
            next_day: None,
        }
    }

    /// Returns the accumulated value of one sample.
    fn attr_value(&self, sample: &Sample) -> Decimal {
        match self.attr {
            ThresholdAttr::Notional => sample.notional,
            ThresholdAttr::Volume => sample.volume,
            ThresholdAttr::Ticks => Decimal::from(sample.ticks),
        }
    }

    /// Builds threshold bars over one partition's samples.
    ///
    /// `partition_start` drives the era check: a partition that opens in a
    /// new era starts from a zeroed cache.
    pub fn build(
        &self,
        samples: &[Sample],
        partition_start: DateTime<Utc>,
        mut cache: ThresholdCache,
    ) -> Result<(Vec<ThresholdBar>, ThresholdCache), InvariantError> {
        if self.era_length.crossed(cache.era_start, partition_start) {
            cache = self.initial_cache(partition_start);
        }
        let mut bars = Vec::new();
        let mut start = 0;
        for (index, sample) in samples.iter().enumerate() {
            cache.accumulator += self.attr_value(sample);
            if cache.accumulator < self.threshold {
                continue;
            }
            let mut bar =
                ThresholdBar::from_run(&samples[start..=index], cache.accumulator, self.top_n);
            if let Some(previous) = cache.next_day.take() {
                bar.absorb_previous(previous, self.top_n);
            }
            cache.accumulator = Decimal::ZERO;
            start = index + 1;
            bars.push(bar);
        }
        if start < samples.len() {
            let mut partial = ThresholdPartial::from_run(&samples[start..], self.top_n);
            if let Some(previous) = cache.next_day.take() {
                partial.absorb_previous(previous, self.top_n);
            }
            cache.next_day = Some(partial);
        }
        Ok((bars, cache))
    }
}

impl Builder for ThresholdBuilder {
    type Bar = ThresholdBar;
    type Cache = ThresholdCache;

    fn kind(&self) -> BarKind {
        BarKind::Threshold
    }

    fn initial_cache(
        &self,
        _samples: &mut Vec<Sample>,
        partition: &Partition,
    ) -> Option<Self::Cache> {
        Some(self.initial_cache(partition.start))
    }

    fn build(
        &self,
        samples: &[Sample],
        partition: &Partition,
        cache: Self::Cache,
    ) -> Result<(Vec<Self::Bar>, Self::Cache), InvariantError> {
        self.build(samples, partition.start, cache)
    }
}
