//! Core types for nazca tick-to-bar aggregation.
//!
//! This crate provides the fundamental data structures used throughout nazca:
//!
//! - [`Tick`] - A single raw trade with price, volume, notional, and side
//! - [`Side`] - Buyer- or seller-initiated trade direction
//! - [`Timeframe`] - Validated candle bar width
//! - [`Partition`] - Hour- or day-aligned processing window
//! - [`EraLength`] - Calendar window for threshold accumulator resets
//! - [`ConfigError`] / [`InvariantError`] - The shared error taxonomy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazca/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod era;
mod error;
mod partition;
mod tick;
mod timeframe;

pub use era::{EraLength, ThresholdAttr};
pub use error::{ConfigError, InvariantError};
pub use partition::{Partition, PartitionIter, PartitionSpan};
pub use tick::{Side, Tick};
pub use timeframe::Timeframe;
