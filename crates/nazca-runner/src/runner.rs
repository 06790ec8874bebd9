//! The chronological partition fold.

use nazca_aggregate::{Builder, merge_ticks};
use nazca_types::Partition;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::{BarSink, CacheStore, RunnerError, TickSource};

/// What happened to one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionOutcome {
    /// The destination already reported completion; nothing was done.
    Skipped,
    /// Zero samples: completion recorded, cache passed through unchanged.
    Empty,
    /// Bars were written and the successor cache stored.
    Completed {
        /// Number of bars emitted.
        bars: usize,
    },
}

/// Totals over one [`PartitionedRunner::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Partitions processed to completion with bars written.
    pub completed: usize,
    /// Partitions skipped as already complete.
    pub skipped: usize,
    /// Partitions with zero samples.
    pub empty: usize,
    /// Total bars written.
    pub bars: usize,
}

/// Folds a builder over a chronological sequence of partitions.
///
/// Candle partitions only carry the previous close, so re-running them out
/// of order is harmless; renko and threshold partitions form a strict
/// linear chain and must be driven forward, one at a time (see
/// [`nazca_aggregate::BarKind::is_order_dependent`]). The runner performs
/// no retries: collaborator failures surface immediately, and transient
/// storage or network conditions are the collaborators' concern.
#[derive(Debug)]
pub struct PartitionedRunner<B, S, C, K> {
    builder: B,
    source: S,
    cache_store: C,
    sink: K,
    cache_required: bool,
}

impl<B, S, C, K> PartitionedRunner<B, S, C, K>
where
    B: Builder,
    B::Cache: Serialize + DeserializeOwned,
    S: TickSource,
    C: CacheStore,
    K: BarSink<B::Bar>,
{
    /// Creates a runner that bootstraps when no predecessor cache exists.
    pub const fn new(builder: B, source: S, cache_store: C, sink: K) -> Self {
        Self {
            builder,
            source,
            cache_store,
            sink,
            cache_required: false,
        }
    }

    /// Requires a predecessor cache for every partition.
    ///
    /// Set once the series has been bootstrapped: from then on a missing
    /// cache is a gap in the pipeline, not an invitation to re-seed.
    #[must_use]
    pub const fn cache_required(mut self, required: bool) -> Self {
        self.cache_required = required;
        self
    }

    /// Runs every partition in the given order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RunnerError`]; partitions already processed
    /// stay recorded complete, so the run can be resumed after the cause
    /// is fixed.
    pub fn run(
        &self,
        partitions: impl IntoIterator<Item = Partition>,
    ) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::default();
        for partition in partitions {
            match self.run_partition(&partition)? {
                PartitionOutcome::Skipped => summary.skipped += 1,
                PartitionOutcome::Empty => summary.empty += 1,
                PartitionOutcome::Completed { bars } => {
                    summary.completed += 1;
                    summary.bars += bars;
                }
            }
        }
        Ok(summary)
    }

    /// Runs a single partition.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when a collaborator fails, a required
    /// predecessor cache is missing, or the builder detects an invariant
    /// violation. Nothing is written for a failed partition.
    pub fn run_partition(&self, partition: &Partition) -> Result<PartitionOutcome, RunnerError> {
        let key = partition.key();
        if self.store_err(&key, self.cache_store.is_complete(&key))? {
            debug!(partition = %key, "destination already complete, skipping");
            return Ok(PartitionOutcome::Skipped);
        }

        let ticks = self
            .source
            .fetch(partition)
            .map_err(|source| RunnerError::Source {
                key: key.clone(),
                source: Box::new(source),
            })?;
        let mut samples = merge_ticks(&ticks);

        let previous_key = partition.previous().key();
        let cache = self.store_err(&key, self.cache_store.get::<B::Cache>(&previous_key))?;
        let cache = match cache {
            Some(cache) => cache,
            None if self.cache_required => return Err(RunnerError::MissingCache { key }),
            None => match self.builder.initial_cache(&mut samples, partition) {
                Some(cache) => cache,
                None => {
                    // Nothing to bootstrap from; completion is still recorded.
                    self.store_err(&key, self.cache_store.set::<B::Cache>(&key, None, true))?;
                    debug!(partition = %key, "no data to bootstrap, recorded complete");
                    return Ok(PartitionOutcome::Empty);
                }
            },
        };

        if samples.is_empty() {
            self.store_err(&key, self.cache_store.set(&key, Some(&cache), true))?;
            debug!(partition = %key, "empty partition, cache passed through");
            return Ok(PartitionOutcome::Empty);
        }

        let (bars, cache) = self
            .builder
            .build(&samples, partition, cache)
            .map_err(|source| RunnerError::Invariant {
                key: key.clone(),
                source,
            })?;
        self.sink
            .write(&key, &bars)
            .map_err(|source| RunnerError::Sink {
                key: key.clone(),
                source: Box::new(source),
            })?;
        self.store_err(&key, self.cache_store.set(&key, Some(&cache), true))?;
        info!(
            partition = %key,
            kind = %self.builder.kind(),
            bars = bars.len(),
            "partition complete"
        );
        Ok(PartitionOutcome::Completed { bars: bars.len() })
    }

    /// Tags a cache-store result with the partition key.
    fn store_err<T>(&self, key: &str, result: Result<T, C::Error>) -> Result<T, RunnerError> {
        result.map_err(|source| RunnerError::Store {
            key: key.to_string(),
            source: Box::new(source),
        })
    }
}
