//! Raw trade tick representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction, as classified by the tick rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer-initiated trade (+1).
    Buy,
    /// Seller-initiated trade (-1).
    Sell,
}

impl Side {
    /// Returns the signed tick rule: +1 for buys, -1 for sells.
    #[must_use]
    pub const fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    /// Returns true if the trade was buyer-initiated.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single raw trade tick.
///
/// Ticks arrive pre-sorted by `(symbol, timestamp, nanoseconds, arrival
/// index)`; nothing downstream re-sorts them. `nanoseconds` is the sub-tick
/// tie-breaker for exchanges that split one fill across records, zero when
/// the venue does not report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol, present only for multi-instrument tables.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// Timestamp of the trade (UTC).
    pub timestamp: DateTime<Utc>,
    /// Sub-second tie-breaker, 0 if unknown.
    pub nanoseconds: u32,
    /// Trade price.
    pub price: Decimal,
    /// Quote-currency amount.
    pub volume: Decimal,
    /// Base-currency amount.
    pub notional: Decimal,
    /// Buyer- or seller-initiated.
    pub side: Side,
}

impl Tick {
    /// Creates a new tick without a symbol.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        nanoseconds: u32,
        price: Decimal,
        volume: Decimal,
        notional: Decimal,
        side: Side,
    ) -> Self {
        Self {
            symbol: None,
            timestamp,
            nanoseconds,
            price,
            volume,
            notional,
            side,
        }
    }

    /// Attaches an instrument symbol, for multi-instrument tables.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Returns true if this tick belongs to the same instantaneous
    /// same-side fill as `other`.
    #[must_use]
    pub fn same_fill(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.timestamp == other.timestamp
            && self.nanoseconds == other.nanoseconds
            && self.side == other.side
    }
}
