//! Tick merging into samples.

use chrono::{DateTime, Utc};
use nazca_types::{Side, Tick};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One or more consecutive ticks merged into a single fill.
///
/// Exchanges split a taker order that sweeps several resting orders into
/// multiple trade records sharing one timestamp, nanosecond value, and
/// side; a sample reunites such a run. Closing values come from the run's
/// last tick, amounts are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Instrument symbol, present only for multi-instrument tables.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// Timestamp of the run's last tick (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker of the run's last tick.
    pub nanoseconds: u32,
    /// Closing price of the run.
    pub price: Decimal,
    /// Volume-weighted price over the run.
    pub vwap: Decimal,
    /// Total quote-currency amount.
    pub volume: Decimal,
    /// Total base-currency amount.
    pub notional: Decimal,
    /// Number of raw ticks merged into this sample.
    pub ticks: u32,
    /// Trade direction of the run.
    pub side: Side,
}

impl Sample {
    /// Aggregates one non-empty run of same-fill ticks.
    fn from_run(run: &[Tick]) -> Self {
        let last = &run[run.len() - 1];
        let mut volume = Decimal::ZERO;
        let mut notional = Decimal::ZERO;
        for tick in run {
            volume += tick.volume;
            notional += tick.notional;
        }
        // The volume/notional quotient is only meaningful when price moved
        // within the run.
        let vwap = if run.len() > 1 && run[0].price != last.price {
            volume.checked_div(notional).unwrap_or(last.price)
        } else {
            last.price
        };
        Self {
            symbol: last.symbol.clone(),
            timestamp: last.timestamp,
            nanoseconds: last.nanoseconds,
            price: last.price,
            vwap,
            volume,
            notional,
            ticks: run.len() as u32,
            side: last.side,
        }
    }
}

/// Collapses runs of consecutive same-fill ticks into samples.
///
/// A run boundary is emitted whenever the next tick differs from the run's
/// anchor in symbol, timestamp, nanoseconds, or side. The input is assumed
/// pre-sorted; the scan is a single forward pass and keeps no state across
/// calls, so partitions can be merged independently and in any order.
#[must_use]
pub fn merge_ticks(ticks: &[Tick]) -> Vec<Sample> {
    let mut samples = Vec::new();
    if ticks.is_empty() {
        return samples;
    }
    let mut start = 0;
    for index in 1..=ticks.len() {
        let boundary = index == ticks.len() || !ticks[start].same_fill(&ticks[index]);
        if boundary {
            samples.push(Sample::from_run(&ticks[start..index]));
            start = index;
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn make_tick(second: u32, nanoseconds: u32, price: Decimal, side: Side) -> Tick {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, second).unwrap();
        Tick::new(timestamp, nanoseconds, price, dec!(10), dec!(0.1), side)
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_ticks(&[]).is_empty());
    }

    #[test]
    fn test_single_tick() {
        let ticks = vec![make_tick(0, 0, dec!(100), Side::Buy)];
        let samples = merge_ticks(&ticks);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].ticks, 1);
        assert_eq!(samples[0].price, dec!(100));
        assert_eq!(samples[0].vwap, dec!(100));
    }

    #[test]
    fn test_same_fill_run_merged() {
        let ticks = vec![
            make_tick(0, 500, dec!(100), Side::Buy),
            make_tick(0, 500, dec!(101), Side::Buy),
            make_tick(1, 0, dec!(102), Side::Sell),
        ];
        let samples = merge_ticks(&ticks);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].ticks, 2);
        assert_eq!(samples[0].price, dec!(101));
        assert_eq!(samples[0].volume, dec!(20));
        assert_eq!(samples[0].notional, dec!(0.2));
        assert_eq!(samples[1].ticks, 1);
    }

    #[test]
    fn test_side_splits_run() {
        let ticks = vec![
            make_tick(0, 500, dec!(100), Side::Buy),
            make_tick(0, 500, dec!(100), Side::Sell),
        ];
        assert_eq!(merge_ticks(&ticks).len(), 2);
    }

    #[test]
    fn test_vwap_unchanged_price() {
        // Price did not move within the run, so vwap is the close.
        let ticks = vec![
            make_tick(0, 500, dec!(100), Side::Buy),
            make_tick(0, 500, dec!(100), Side::Buy),
        ];
        let samples = merge_ticks(&ticks);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].vwap, dec!(100));
    }

    #[test]
    fn test_vwap_changed_price() {
        let ticks = vec![
            make_tick(0, 500, dec!(100), Side::Buy),
            make_tick(0, 500, dec!(102), Side::Buy),
        ];
        let samples = merge_ticks(&ticks);

        assert_eq!(samples[0].vwap, dec!(20) / dec!(0.2));
    }

    #[test]
    fn test_tick_count_conserved() {
        let ticks = vec![
            make_tick(0, 0, dec!(100), Side::Buy),
            make_tick(0, 0, dec!(101), Side::Buy),
            make_tick(0, 0, dec!(101), Side::Sell),
            make_tick(1, 0, dec!(102), Side::Sell),
            make_tick(2, 0, dec!(103), Side::Buy),
        ];
        let samples = merge_ticks(&ticks);
        let total: u32 = samples.iter().map(|s| s.ticks).sum();

        assert_eq!(total as usize, ticks.len());
    }

    #[test]
    fn test_merge_idempotent() {
        // Re-merging the output (samples as single-tick runs) changes nothing.
        let ticks = vec![
            make_tick(0, 0, dec!(100), Side::Buy),
            make_tick(0, 0, dec!(101), Side::Buy),
            make_tick(1, 0, dec!(102), Side::Sell),
            make_tick(2, 0, dec!(103), Side::Buy),
        ];
        let samples = merge_ticks(&ticks);
        let as_ticks: Vec<Tick> = samples
            .iter()
            .map(|s| {
                Tick::new(
                    s.timestamp,
                    s.nanoseconds,
                    s.price,
                    s.volume,
                    s.notional,
                    s.side,
                )
            })
            .collect();
        let remerged = merge_ticks(&as_ticks);

        assert_eq!(remerged.len(), samples.len());
        for (a, b) in samples.iter().zip(&remerged) {
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.nanoseconds, b.nanoseconds);
            assert_eq!(a.price, b.price);
            assert_eq!(a.volume, b.volume);
            assert_eq!(a.notional, b.notional);
            assert_eq!(a.side, b.side);
        }
    }

    #[test]
    fn test_symbol_splits_run() {
        let ticks = vec![
            make_tick(0, 0, dec!(100), Side::Buy).with_symbol("BTCUSD"),
            make_tick(0, 0, dec!(100), Side::Buy).with_symbol("ETHUSD"),
        ];
        let samples = merge_ticks(&ticks);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].symbol.as_deref(), Some("BTCUSD"));
        assert_eq!(samples[1].symbol.as_deref(), Some("ETHUSD"));
    }
}
