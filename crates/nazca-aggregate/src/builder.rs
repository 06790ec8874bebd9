//! The common builder interface driven by the partition runner.

use nazca_types::{InvariantError, Partition};
use serde::{Deserialize, Serialize};

use crate::Sample;

/// The closed set of bar sampling schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    /// Fixed-width time buckets.
    Candle,
    /// Price-level breakout bars.
    Renko,
    /// Accumulator-crossing bars.
    Threshold,
}

impl BarKind {
    /// Returns true if partitions must be processed strictly forward, one
    /// at a time, threading the cache between steps.
    ///
    /// Candle partitions only carry the previous close and may be redone in
    /// any order once bootstrapped; renko and threshold partitions form a
    /// linear chain.
    #[must_use]
    pub const fn is_order_dependent(&self) -> bool {
        matches!(self, Self::Renko | Self::Threshold)
    }

    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Candle => "candle",
            Self::Renko => "renko",
            Self::Threshold => "threshold",
        }
    }
}

impl std::fmt::Display for BarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bar builder: one partition's samples in, bars plus carry-over out.
///
/// Builders are pure and synchronous. Each call takes ownership of the
/// incoming cache and returns the successor cache; the caller persists it
/// and threads it into the next partition. Splitting a contiguous sample
/// sequence at any partition boundary and threading the cache through both
/// calls must reproduce the unsplit bar sequence and final cache exactly.
pub trait Builder {
    /// Emitted bar shape.
    type Bar;
    /// Carry-over state between partitions.
    type Cache;

    /// Returns which sampling scheme this builder implements.
    fn kind(&self) -> BarKind;

    /// Synthesizes the cache for a series' first-ever partition.
    ///
    /// Returns `None` when the batch is empty and bootstrap must wait for
    /// the next partition with data. Renko consumes the batch's first
    /// sample to seed its level; it is discarded, never emitted.
    fn initial_cache(&self, samples: &mut Vec<Sample>, partition: &Partition)
    -> Option<Self::Cache>;

    /// Builds bars over one partition's samples.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] when processing detects an internal
    /// defect; the partition must be aborted, not written.
    fn build(
        &self,
        samples: &[Sample],
        partition: &Partition,
        cache: Self::Cache,
    ) -> Result<(Vec<Self::Bar>, Self::Cache), InvariantError>;
}
