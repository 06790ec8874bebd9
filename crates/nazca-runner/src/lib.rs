//! Partition orchestration for nazca tick-to-bar aggregation.
//!
//! This crate drives the builders from `nazca-aggregate` over a sequence of
//! partitions:
//!
//! - [`PartitionedRunner`] - The chronological fold with idempotent skips
//! - [`TickSource`] / [`CacheStore`] / [`BarSink`] - External collaborators
//! - [`memory`] - In-memory collaborators for tests and examples

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazca/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod memory;
mod runner;
mod store;

pub use error::RunnerError;
pub use runner::{PartitionOutcome, PartitionedRunner, RunSummary};
pub use store::{BarSink, CacheStore, TickSource};
