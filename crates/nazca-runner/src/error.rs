//! Runner error taxonomy.

use nazca_types::InvariantError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced while driving partitions.
///
/// Every variant carries the partition key so an operator can tell bad
/// input data from a bug. Nothing here is retried by the runner itself.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A required predecessor cache was absent.
    ///
    /// Signals a gap in the upstream pipeline, not a transient condition:
    /// the partition before this one never completed.
    #[error("partition {key}: predecessor cache missing")]
    MissingCache {
        /// Key of the partition that could not start.
        key: String,
    },

    /// The builder detected an internal defect.
    #[error("partition {key}: {source}")]
    Invariant {
        /// Key of the aborted partition.
        key: String,
        /// The violated invariant with its offending values.
        #[source]
        source: InvariantError,
    },

    /// The tick source failed.
    #[error("partition {key}: tick source failed: {source}")]
    Source {
        /// Key of the partition being fetched.
        key: String,
        /// The collaborator's error.
        #[source]
        source: BoxError,
    },

    /// The cache store failed.
    #[error("partition {key}: cache store failed: {source}")]
    Store {
        /// Key of the partition being read or written.
        key: String,
        /// The collaborator's error.
        #[source]
        source: BoxError,
    },

    /// The bar sink failed.
    #[error("partition {key}: bar sink failed: {source}")]
    Sink {
        /// Key of the partition being written.
        key: String,
        /// The collaborator's error.
        #[source]
        source: BoxError,
    },
}
