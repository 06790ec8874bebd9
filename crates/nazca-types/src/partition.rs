//! Hour- and day-aligned processing windows.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Width of a processing partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionSpan {
    /// One-hour partitions.
    Hour,
    /// One-day partitions.
    Day,
}

impl PartitionSpan {
    /// Returns the span as a duration.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::Hour => TimeDelta::hours(1),
            Self::Day => TimeDelta::days(1),
        }
    }

    /// Returns the span as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

impl std::fmt::Display for PartitionSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A half-open processing window `[start, end)` aligned to its span.
///
/// Partitions are the unit of incremental processing: tick batches are
/// fetched, aggregated, and recorded complete one partition at a time, with
/// carry-over state keyed by the partition's document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    /// Window start, truncated to the span boundary.
    pub start: DateTime<Utc>,
    /// Window width.
    pub span: PartitionSpan,
}

impl Partition {
    /// Creates a partition containing the given timestamp.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, span: PartitionSpan) -> Self {
        let start = match span {
            PartitionSpan::Hour => Utc
                .with_ymd_and_hms(
                    timestamp.year(),
                    timestamp.month(),
                    timestamp.day(),
                    timestamp.hour(),
                    0,
                    0,
                )
                .unwrap(),
            PartitionSpan::Day => Utc
                .with_ymd_and_hms(timestamp.year(), timestamp.month(), timestamp.day(), 0, 0, 0)
                .unwrap(),
        };
        Self { start, span }
    }

    /// Returns the exclusive end of the window.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.span.duration()
    }

    /// Returns the partition immediately before this one.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self {
            start: self.start - self.span.duration(),
            span: self.span,
        }
    }

    /// Returns true if the timestamp falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end()
    }

    /// Returns the document key for this partition.
    ///
    /// Day partitions use the ISO date (`2024-01-02`); hour partitions
    /// append the hour (`2024-01-02T07`).
    #[must_use]
    pub fn key(&self) -> String {
        match self.span {
            PartitionSpan::Hour => self.start.format("%Y-%m-%dT%H").to_string(),
            PartitionSpan::Day => self.start.format("%Y-%m-%d").to_string(),
        }
    }

    /// Returns an iterator over all partitions from `from` through `to`,
    /// inclusive of the partition containing each endpoint.
    #[must_use]
    pub fn range(from: DateTime<Utc>, to: DateTime<Utc>, span: PartitionSpan) -> PartitionIter {
        PartitionIter {
            current: Self::new(from, span),
            last: Self::new(to, span),
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Iterator over a chronological run of partitions.
#[derive(Debug, Clone)]
pub struct PartitionIter {
    current: Partition,
    last: Partition,
}

impl Iterator for PartitionIter {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.start > self.last.start {
            return None;
        }
        let result = self.current;
        self.current = Partition {
            start: self.current.start + self.current.span.duration(),
            span: self.current.span,
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.start > self.last.start {
            return (0, Some(0));
        }
        let width = self.current.span.duration();
        let remaining =
            ((self.last.start - self.current.start).num_seconds() / width.num_seconds()) as usize
                + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PartitionIter {}
