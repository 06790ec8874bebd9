//! Largest-notional sample tracking.

use chrono::{DateTime, Utc};
use nazca_types::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Sample;

/// Projection of a [`Sample`] retained for inspection inside a bar.
///
/// Display-only: entries are never re-aggregated into bar statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopNEntry {
    /// Timestamp of the sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker.
    pub nanoseconds: u32,
    /// Closing price of the sample.
    pub price: Decimal,
    /// Volume-weighted price of the sample.
    pub vwap: Decimal,
    /// Quote-currency amount.
    pub volume: Decimal,
    /// Base-currency amount.
    pub notional: Decimal,
    /// Raw ticks merged into the sample.
    pub ticks: u32,
    /// Trade direction.
    pub side: Side,
}

impl From<&Sample> for TopNEntry {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            nanoseconds: sample.nanoseconds,
            price: sample.price,
            vwap: sample.vwap,
            volume: sample.volume,
            notional: sample.notional,
            ticks: sample.ticks,
            side: sample.side,
        }
    }
}

/// Selects the `n` largest-notional samples, returned in display order.
///
/// Ties are broken by earlier position. The result is sorted ascending by
/// `(timestamp, nanoseconds)` regardless of selection order. `n == 0`
/// disables tracking and always yields an empty list.
#[must_use]
pub fn select_top_n(samples: &[Sample], n: usize) -> Vec<TopNEntry> {
    if n == 0 {
        return Vec::new();
    }
    let mut entries: Vec<TopNEntry> = samples.iter().map(TopNEntry::from).collect();
    keep_largest(&mut entries, n);
    entries
}

/// Merges two top-N lists, keeping the `n` globally largest entries.
///
/// `previous` must precede `current` chronologically, as when a carried-over
/// partial bar is merged into a newly closed bar.
#[must_use]
pub fn merge_top_n(previous: Vec<TopNEntry>, current: Vec<TopNEntry>, n: usize) -> Vec<TopNEntry> {
    let mut merged = previous;
    merged.extend(current);
    keep_largest(&mut merged, n);
    merged
}

/// Truncates to the `n` largest-notional entries, then restores display order.
fn keep_largest(entries: &mut Vec<TopNEntry>, n: usize) {
    // Stable sort: earlier positions win notional ties.
    entries.sort_by(|a, b| b.notional.cmp(&a.notional));
    entries.truncate(n);
    entries.sort_by(|a, b| (a.timestamp, a.nanoseconds).cmp(&(b.timestamp, b.nanoseconds)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn make_sample(second: u32, notional: Decimal) -> Sample {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, second).unwrap();
        Sample {
            symbol: None,
            timestamp,
            nanoseconds: 0,
            price: dec!(100),
            vwap: dec!(100),
            volume: dec!(10),
            notional,
            ticks: 1,
            side: Side::Buy,
        }
    }

    #[test]
    fn test_select_bound() {
        let samples: Vec<Sample> = (0..10).map(|i| make_sample(i, Decimal::from(i))).collect();
        let top = select_top_n(&samples, 3);

        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_select_keeps_largest() {
        let samples = vec![
            make_sample(0, dec!(5)),
            make_sample(1, dec!(50)),
            make_sample(2, dec!(1)),
            make_sample(3, dec!(20)),
        ];
        let top = select_top_n(&samples, 2);
        let notionals: Vec<Decimal> = top.iter().map(|e| e.notional).collect();

        assert_eq!(notionals, vec![dec!(50), dec!(20)]);
    }

    #[test]
    fn test_select_display_order() {
        // Largest notional arrives last; result is still chronological.
        let samples = vec![
            make_sample(0, dec!(1)),
            make_sample(1, dec!(2)),
            make_sample(2, dec!(3)),
        ];
        let top = select_top_n(&samples, 2);

        assert!(top[0].timestamp < top[1].timestamp);
        assert_eq!(top[0].notional, dec!(2));
    }

    #[test]
    fn test_select_ties_prefer_earlier() {
        let samples = vec![
            make_sample(0, dec!(5)),
            make_sample(1, dec!(5)),
            make_sample(2, dec!(5)),
        ];
        let top = select_top_n(&samples, 2);
        let seconds: Vec<u32> = top
            .iter()
            .map(|e| e.timestamp.timestamp() as u32 % 60)
            .collect();

        assert_eq!(seconds, vec![0, 1]);
    }

    #[test]
    fn test_select_zero_disabled() {
        let samples = vec![make_sample(0, dec!(5))];
        assert!(select_top_n(&samples, 0).is_empty());
    }

    #[test]
    fn test_merge_never_grows_past_n() {
        let a = select_top_n(
            &(0..5).map(|i| make_sample(i, Decimal::from(i))).collect::<Vec<_>>(),
            5,
        );
        let b = select_top_n(
            &(5..10).map(|i| make_sample(i, Decimal::from(i))).collect::<Vec<_>>(),
            5,
        );
        let merged = merge_top_n(a, b, 5);

        assert_eq!(merged.len(), 5);
        // The five globally largest notionals are 5..10.
        assert!(merged.iter().all(|e| e.notional >= dec!(5)));
    }

    #[test]
    fn test_merge_idempotent() {
        let samples: Vec<Sample> = (0..6).map(|i| make_sample(i, Decimal::from(i))).collect();
        let top = select_top_n(&samples, 4);
        let again = merge_top_n(top.clone(), Vec::new(), 4);

        assert_eq!(top, again);
    }
}
