//! Synthetic tick streams for benchmarking.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use chrono::{TimeDelta, TimeZone, Utc};
use nazca_types::{Side, Tick};
use rust_decimal::Decimal;

/// Generates a deterministic pre-sorted tick stream.
///
/// Prices random-walk around 100 in cent steps from a fixed-seed linear
/// congruential generator, with occasional same-instant same-side repeats
/// so the merge path has real runs to collapse.
#[must_use]
pub fn synthetic_ticks(count: usize) -> Vec<Tick> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut state: u64 = 0x5DEE_CE66;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 33) as u32
    };

    let mut price_cents: i64 = 10_000;
    let mut ticks = Vec::with_capacity(count);
    for index in 0..count {
        let roll = next();
        price_cents += i64::from(roll % 5) - 2;
        let price = Decimal::new(price_cents, 2);
        let volume = Decimal::new(i64::from(roll % 1000) + 1, 1);
        let notional = volume / price;
        let side = if roll % 2 == 0 { Side::Buy } else { Side::Sell };
        // Every fourth tick shares the previous instant, forming a run.
        let instant = (index - index % 4) as i64;
        let timestamp = start + TimeDelta::milliseconds(instant * 50);
        ticks.push(Tick::new(timestamp, 0, price, volume, notional, side));
    }
    ticks
}
