//! Bar construction for nazca tick-to-bar aggregation.
//!
//! This crate turns pre-sorted trade ticks into bars:
//!
//! - [`merge_ticks`] - Collapses same-instant same-side fills into [`Sample`]s
//! - [`select_top_n`] / [`merge_top_n`] - Largest-notional sample tracking
//! - [`CandleBuilder`] - Fixed-width time buckets with open carry-forward
//! - [`RenkoBuilder`] - Price-level breakout bars with reversal bounds
//! - [`ThresholdBuilder`] - Accumulator-crossing bars with era resets
//! - [`Builder`] - The common interface the partition runner drives

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazca/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod candle;
mod renko;
mod sample;
mod stats;
mod threshold;
mod top_n;

pub use builder::{BarKind, Builder};
pub use candle::{CandleBar, CandleBuilder, CandleCache};
pub use renko::{Direction, RenkoBar, RenkoBuilder, RenkoCache, RenkoPartial};
pub use sample::{Sample, merge_ticks};
pub use stats::BarStats;
pub use threshold::{ThresholdBar, ThresholdBuilder, ThresholdCache, ThresholdPartial};
pub use top_n::{TopNEntry, merge_top_n, select_top_n};
