//! Top-of-book quote snapshot
//!
//! A `Quote` is one observation of the best bid/ask with resting volume,
//! as supplied by the upstream feed. Quotes are immutable once read and
//! arrive in non-decreasing timestamp order; the system never reorders them.

use serde::{Deserialize, Serialize};

/// Best bid/ask snapshot at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Event time in nanoseconds since the epoch
    pub timestamp: i64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub bid_volume: f64,
    pub ask_volume: f64,
}

impl Quote {
    pub fn new(
        timestamp: i64,
        bid_price: f64,
        ask_price: f64,
        bid_volume: f64,
        ask_volume: f64,
    ) -> Self {
        Self {
            timestamp,
            bid_price,
            ask_price,
            bid_volume,
            ask_volume,
        }
    }

    /// Average of best bid and best ask
    #[inline]
    pub fn mid_price(&self) -> f64 {
        (self.bid_price + self.ask_price) / 2.0
    }

    /// Quoted spread (ask - bid)
    #[inline]
    pub fn spread(&self) -> f64 {
        self.ask_price - self.bid_price
    }

    /// Total resting volume on both sides
    #[inline]
    pub fn total_depth(&self) -> f64 {
        self.bid_volume + self.ask_volume
    }

    /// Check that the quote is usable for feature computation
    ///
    /// Rejects non-finite values, negative volumes, and non-positive prices.
    /// Crossed books (bid above ask) are unusual but not rejected here; the
    /// derived spread simply comes out negative.
    pub fn is_valid(&self) -> bool {
        let fields = [
            self.bid_price,
            self.ask_price,
            self.bid_volume,
            self.ask_volume,
        ];
        fields.iter().all(|v| v.is_finite())
            && self.bid_price > 0.0
            && self.ask_price > 0.0
            && self.bid_volume >= 0.0
            && self.ask_volume >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(bid: f64, ask: f64, bv: f64, av: f64) -> Quote {
        Quote::new(0, bid, ask, bv, av)
    }

    #[test]
    fn test_derived_values() {
        let q = quote(99.0, 101.0, 300.0, 100.0);
        assert_eq!(q.mid_price(), 100.0);
        assert_eq!(q.spread(), 2.0);
        assert_eq!(q.total_depth(), 400.0);
    }

    #[test]
    fn test_validity() {
        assert!(quote(99.0, 101.0, 0.0, 0.0).is_valid());
        assert!(!quote(0.0, 101.0, 1.0, 1.0).is_valid());
        assert!(!quote(99.0, 101.0, -1.0, 1.0).is_valid());
        assert!(!quote(f64::NAN, 101.0, 1.0, 1.0).is_valid());
        // Crossed book is tolerated
        assert!(quote(101.0, 99.0, 1.0, 1.0).is_valid());
    }
}
