//! Fixed-width time-bucket candles with open carry-forward.

use chrono::{DateTime, Utc};
use nazca_types::{InvariantError, Partition, Timeframe};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BarKind, BarStats, Builder, Sample, TopNEntry, select_top_n};

/// One OHLCV candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleBar {
    /// Instrument symbol, present only for multi-instrument tables.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// Bucket start (UTC), so the bar sorts into its own partition.
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the bucket's first sample.
    pub nanoseconds: u32,
    /// Opening price, carried forward from the previous close.
    pub open: Decimal,
    /// Highest price, extended to include the carried open.
    pub high: Decimal,
    /// Lowest price, extended to include the carried open.
    pub low: Decimal,
    /// Closing price of the bucket's last sample.
    pub close: Decimal,
    /// Summed amounts and tick counts.
    #[serde(flatten)]
    pub stats: BarStats,
    /// Largest-notional samples in the bucket.
    pub top_n: Vec<TopNEntry>,
}

/// Carry-over state for candle aggregation: the previous bucket's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleCache {
    /// Close of the last non-empty bucket.
    pub last_close: Decimal,
}

/// Builds fixed-width time-bucket candles.
///
/// The partition window is tiled with half-open `timeframe`-width buckets.
/// Non-empty buckets emit one bar each; empty buckets are skipped and do
/// not disturb the carried close.
#[derive(Debug, Clone, Copy)]
pub struct CandleBuilder {
    timeframe: Timeframe,
    top_n: usize,
}

impl CandleBuilder {
    /// Creates a candle builder.
    ///
    /// The timeframe is already validated at its own construction; `top_n`
    /// of zero disables largest-notional tracking.
    #[must_use]
    pub const fn new(timeframe: Timeframe, top_n: usize) -> Self {
        Self { timeframe, top_n }
    }

    /// Returns the configured bar width.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Synthesizes the series' first cache from its first batch.
    #[must_use]
    pub fn seed_cache(samples: &[Sample]) -> Option<CandleCache> {
        samples.first().map(|sample| CandleCache {
            last_close: sample.price,
        })
    }

    /// Builds candles over `[window_start, window_end)`.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::MixedSymbols`] when a bucket mixes
    /// instruments; multi-instrument tables are split per symbol upstream.
    pub fn build(
        &self,
        samples: &[Sample],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        mut cache: CandleCache,
    ) -> Result<(Vec<CandleBar>, CandleCache), InvariantError> {
        let step = self.timeframe.duration();
        let mut bars = Vec::new();
        let mut cursor = 0;
        let mut bucket_start = window_start;
        while bucket_start < window_end {
            let bucket_end = bucket_start + step;
            let from = cursor;
            while cursor < samples.len() && samples[cursor].timestamp < bucket_end {
                cursor += 1;
            }
            let bucket = &samples[from..cursor];
            if !bucket.is_empty() {
                let bar = self.bucket_bar(bucket, bucket_start, cache.last_close)?;
                cache.last_close = bar.close;
                bars.push(bar);
            }
            bucket_start = bucket_end;
        }
        Ok((bars, cache))
    }

    /// Aggregates one non-empty bucket.
    fn bucket_bar(
        &self,
        bucket: &[Sample],
        bucket_start: DateTime<Utc>,
        open: Decimal,
    ) -> Result<CandleBar, InvariantError> {
        let first = &bucket[0];
        let last = &bucket[bucket.len() - 1];
        let mut high = open;
        let mut low = open;
        for sample in bucket {
            if sample.symbol != first.symbol {
                return Err(InvariantError::MixedSymbols {
                    first: first.symbol.clone(),
                    second: sample.symbol.clone(),
                });
            }
            high = high.max(sample.price);
            low = low.min(sample.price);
        }
        Ok(CandleBar {
            symbol: first.symbol.clone(),
            timestamp: bucket_start,
            nanoseconds: first.nanoseconds,
            open,
            high,
            low,
            close: last.price,
            stats: BarStats::from_samples(bucket),
            top_n: select_top_n(bucket, self.top_n),
        })
    }
}

impl Builder for CandleBuilder {
    type Bar = CandleBar;
    type Cache = CandleCache;

    fn kind(&self) -> BarKind {
        BarKind::Candle
    }

    fn initial_cache(
        &self,
        samples: &mut Vec<Sample>,
        _partition: &Partition,
    ) -> Option<Self::Cache> {
        Self::seed_cache(samples)
    }

    fn build(
        &self,
        samples: &[Sample],
        partition: &Partition,
        cache: Self::Cache,
    ) -> Result<(Vec<Self::Bar>, Self::Cache), InvariantError> {
        self.build(samples, partition.start, partition.end(), cache)
    }
}
