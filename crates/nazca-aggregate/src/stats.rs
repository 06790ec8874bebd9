//! Additive bar statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Sample;

/// The additive fields shared by every bar shape and carried partial.
///
/// Serde-flattened into bars and cache documents so the stored field names
/// stay flat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarStats {
    /// Total quote-currency amount.
    pub volume: Decimal,
    /// Buyer-initiated quote-currency amount.
    pub buy_volume: Decimal,
    /// Total base-currency amount.
    pub notional: Decimal,
    /// Buyer-initiated base-currency amount.
    pub buy_notional: Decimal,
    /// Total raw tick count.
    pub ticks: u32,
    /// Buyer-initiated raw tick count.
    pub buy_ticks: u32,
}

impl BarStats {
    /// Sums statistics over a run of samples.
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut stats = Self::default();
        for sample in samples {
            stats.add(sample);
        }
        stats
    }

    /// Adds one sample's amounts.
    pub fn add(&mut self, sample: &Sample) {
        self.volume += sample.volume;
        self.notional += sample.notional;
        self.ticks += sample.ticks;
        if sample.side.is_buy() {
            self.buy_volume += sample.volume;
            self.buy_notional += sample.notional;
            self.buy_ticks += sample.ticks;
        }
    }

    /// Adds another accumulated total.
    pub fn merge(&mut self, other: &Self) {
        self.volume += other.volume;
        self.buy_volume += other.buy_volume;
        self.notional += other.notional;
        self.buy_notional += other.buy_notional;
        self.ticks += other.ticks;
        self.buy_ticks += other.buy_ticks;
    }
}
