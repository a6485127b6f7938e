//! Online feature computation per quote
//!
//! Maintains rolling windows of mid-price and total depth and derives one
//! feature vector per incoming quote. Every feature has an explicit
//! zero-fill policy (never NaN) so the predictor downstream always
//! receives a complete, finite vector regardless of how little history
//! exists.

use iris_core::{Quote, RollingWindow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Feature name -> value mapping produced per quote
pub type FeatureVector = HashMap<String, f64>;

/// Configured lookback horizons for windowed features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Sample-count horizons for returns and volatility
    pub horizons: Vec<usize>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            horizons: vec![10, 50, 100],
        }
    }
}

impl FeatureConfig {
    /// Window capacity: one extra slot past the longest horizon so a full
    /// k-step lookback stays available once the window saturates
    pub fn window_capacity(&self) -> usize {
        self.horizons.iter().copied().max().unwrap_or(1) + 1
    }

    /// The full feature schema this configuration produces, in a stable order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![
            "mid_price".to_string(),
            "spread".to_string(),
            "spread_bps".to_string(),
            "obi".to_string(),
            "weighted_mid".to_string(),
        ];
        for k in &self.horizons {
            names.push(format!("price_return_{}", k));
        }
        for k in &self.horizons {
            names.push(format!("volatility_{}", k));
        }
        names.push("book_depth".to_string());
        names.push("microprice".to_string());
        names
    }
}

/// Streaming feature state for one instrument
///
/// Owns its rolling windows exclusively; quotes are consumed and not
/// retained beyond window membership.
pub struct FeatureStream {
    config: FeatureConfig,
    mid_window: RollingWindow,
    depth_window: RollingWindow,
}

impl FeatureStream {
    pub fn new(config: FeatureConfig) -> Self {
        let capacity = config.window_capacity();
        Self {
            config,
            mid_window: RollingWindow::new(capacity),
            depth_window: RollingWindow::new(capacity),
        }
    }

    /// Number of quotes ingested, capped at window capacity
    pub fn history_len(&self) -> usize {
        self.mid_window.len()
    }

    /// Consume one quote and derive its feature vector
    pub fn ingest(&mut self, quote: &Quote) -> FeatureVector {
        let mut features = FeatureVector::new();

        let mid = quote.mid_price();
        let spread = quote.spread();
        let total_depth = quote.total_depth();

        features.insert("mid_price".to_string(), mid);
        features.insert("spread".to_string(), spread);
        features.insert(
            "spread_bps".to_string(),
            if mid > 0.0 { spread / mid * 10_000.0 } else { 0.0 },
        );

        // Order-book imbalance and volume-weighted mid, guarded against an
        // empty book on both sides
        let (obi, weighted_mid) = if total_depth > 0.0 {
            (
                (quote.bid_volume - quote.ask_volume) / total_depth,
                (quote.bid_price * quote.ask_volume + quote.ask_price * quote.bid_volume)
                    / total_depth,
            )
        } else {
            (0.0, mid)
        };
        features.insert("obi".to_string(), obi);
        features.insert("weighted_mid".to_string(), weighted_mid);

        self.mid_window.push(mid);
        self.depth_window.push(total_depth);

        for &k in &self.config.horizons {
            features.insert(format!("price_return_{}", k), self.price_return(k));
            features.insert(format!("volatility_{}", k), self.volatility(k));
        }

        features.insert("book_depth".to_string(), total_depth);
        features.insert("microprice".to_string(), weighted_mid);

        features
    }

    /// Return over the last `k` samples; 0.0 until the window holds more
    /// than `k` observations or when the base price is zero
    fn price_return(&self, k: usize) -> f64 {
        let latest = match self.mid_window.latest() {
            Some(v) => v,
            None => return 0.0,
        };
        match self.mid_window.value_from_latest(k) {
            Some(base) if base != 0.0 => (latest - base) / base,
            _ => 0.0,
        }
    }

    /// Sample standard deviation of the last `k` mid-prices; 0.0 until the
    /// window holds more than `k` observations
    fn volatility(&self, k: usize) -> f64 {
        if self.mid_window.len() <= k {
            return 0.0;
        }
        self.mid_window.std_dev_last(k).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(i: i64, bid: f64, ask: f64, bv: f64, av: f64) -> Quote {
        Quote::new(i, bid, ask, bv, av)
    }

    #[test]
    fn test_schema_is_complete_from_first_quote() {
        let config = FeatureConfig::default();
        let expected = config.feature_names();
        let mut stream = FeatureStream::new(config);

        let features = stream.ingest(&quote(0, 99.0, 101.0, 500.0, 300.0));
        for name in &expected {
            let value = features.get(name).copied();
            assert!(value.is_some(), "missing feature {}", name);
            assert!(value.unwrap().is_finite(), "non-finite feature {}", name);
        }
    }

    #[test]
    fn test_cross_sectional_features() {
        let mut stream = FeatureStream::new(FeatureConfig::default());
        let features = stream.ingest(&quote(0, 99.0, 101.0, 300.0, 100.0));

        assert_eq!(features["mid_price"], 100.0);
        assert_eq!(features["spread"], 2.0);
        assert!((features["spread_bps"] - 200.0).abs() < 1e-9);
        assert!((features["obi"] - 0.5).abs() < 1e-9);
        // (99*100 + 101*300) / 400 = 100.5
        assert!((features["weighted_mid"] - 100.5).abs() < 1e-9);
        assert_eq!(features["book_depth"], 400.0);
        assert_eq!(features["microprice"], features["weighted_mid"]);
    }

    #[test]
    fn test_empty_book_guards() {
        let mut stream = FeatureStream::new(FeatureConfig::default());
        let features = stream.ingest(&quote(0, 99.0, 101.0, 0.0, 0.0));

        assert_eq!(features["obi"], 0.0);
        assert_eq!(features["weighted_mid"], 100.0);
        assert_eq!(features["book_depth"], 0.0);
    }

    #[test]
    fn test_windowed_features_zero_before_horizon() {
        let config = FeatureConfig {
            horizons: vec![3, 5],
        };
        let mut stream = FeatureStream::new(config);

        // Volatile series so a premature non-zero would show up
        for i in 0..5 {
            let px = 100.0 + (i as f64) * 7.0;
            let features = stream.ingest(&quote(i, px - 0.5, px + 0.5, 10.0, 10.0));
            for k in [3usize, 5] {
                if (i as usize) < k {
                    assert_eq!(
                        features[&format!("price_return_{}", k)], 0.0,
                        "return_{} at index {}",
                        k, i
                    );
                    assert_eq!(
                        features[&format!("volatility_{}", k)], 0.0,
                        "volatility_{} at index {}",
                        k, i
                    );
                }
            }
        }
    }

    #[test]
    fn test_return_after_horizon() {
        let config = FeatureConfig { horizons: vec![3] };
        let mut stream = FeatureStream::new(config);

        // Mids: 100, 102, 104, 106
        let mut last = FeatureVector::new();
        for (i, px) in [100.0, 102.0, 104.0, 106.0].iter().enumerate() {
            last = stream.ingest(&quote(i as i64, px - 1.0, px + 1.0, 10.0, 10.0));
        }
        // (106 - 100) / 100
        assert!((last["price_return_3"] - 0.06).abs() < 1e-12);
        // Sample std dev of [102, 104, 106]
        assert!((last["volatility_3"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_return_still_defined_once_window_saturates() {
        let config = FeatureConfig { horizons: vec![3] };
        let mut stream = FeatureStream::new(config);

        // Capacity is 4; push well past saturation
        let mut last = FeatureVector::new();
        for i in 0..10 {
            let px = 100.0 + i as f64;
            last = stream.ingest(&quote(i, px - 1.0, px + 1.0, 10.0, 10.0));
        }
        // Mids 106..=109 in window; (109 - 106) / 106
        assert!((last["price_return_3"] - 3.0 / 106.0).abs() < 1e-12);
    }
}
