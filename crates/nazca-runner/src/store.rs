//! External collaborator contracts.

use nazca_types::{Partition, Tick};
use serde::{Serialize, de::DeserializeOwned};

/// Supplies one partition's worth of pre-sorted ticks.
///
/// The batch must already be filtered to the partition's time range and
/// sorted by `(symbol, timestamp, nanoseconds, arrival index)`; the runner
/// never re-fetches or re-sorts.
pub trait TickSource {
    /// Collaborator failure, surfaced through [`crate::RunnerError::Source`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the tick batch for a partition.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; the runner does not retry.
    fn fetch(&self, partition: &Partition) -> Result<Vec<Tick>, Self::Error>;
}

/// Persists carry-over caches and per-partition completion flags.
///
/// Modeled on a document cache keyed by partition: each completed partition
/// stores its successor cache (when one exists) together with a completion
/// marker the runner consults for idempotent re-runs.
pub trait CacheStore {
    /// Collaborator failure, surfaced through [`crate::RunnerError::Store`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the cache stored under a partition key.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; a missing document is `None`,
    /// not an error.
    fn get<C: DeserializeOwned>(&self, key: &str) -> Result<Option<C>, Self::Error>;

    /// Stores a cache (or just the completion marker) under a partition key.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; the runner does not retry.
    fn set<C: Serialize>(
        &self,
        key: &str,
        cache: Option<&C>,
        complete: bool,
    ) -> Result<(), Self::Error>;

    /// Returns true if the partition was already recorded complete.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; the runner does not retry.
    fn is_complete(&self, key: &str) -> Result<bool, Self::Error>;
}

/// Accepts the bars emitted for a partition.
pub trait BarSink<B> {
    /// Collaborator failure, surfaced through [`crate::RunnerError::Sink`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes one partition's bars.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; the runner does not retry.
    fn write(&self, key: &str, bars: &[B]) -> Result<(), Self::Error>;
}
