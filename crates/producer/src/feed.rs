//! Quote feed sources
//!
//! The feed is an ordered sequence of quote records, consumed once and
//! never rewound. Two sources: a CSV file produced by the offline data
//! pipeline, and a deterministic synthetic generator (mean-reverting
//! mid-price walk) for demos and end-to-end tests.

use iris_core::Quote;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to read quote feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("quote feed is empty")]
    Empty,

    #[error("quote feed is missing required column '{0}'")]
    MissingColumn(String),
}

const REQUIRED_COLUMNS: [&str; 5] = [
    "timestamp",
    "bid_price",
    "ask_price",
    "bid_volume",
    "ask_volume",
];

/// An in-memory, time-ordered quote sequence
#[derive(Debug)]
pub struct QuoteFeed {
    quotes: Vec<Quote>,
    skipped: usize,
}

impl QuoteFeed {
    /// Load from a headered CSV file
    ///
    /// Malformed rows are skipped and counted, never fatal; a feed that
    /// yields no usable quotes at all is a startup failure.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut lines = contents.lines();

        let header = lines.next().ok_or(FeedError::Empty)?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut indices = [0usize; 5];
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| FeedError::MissingColumn(name.to_string()))?;
        }

        let mut quotes = Vec::new();
        let mut skipped = 0usize;
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line, &indices) {
                Some(quote) if quote.is_valid() => quotes.push(quote),
                _ => skipped += 1,
            }
        }

        if quotes.is_empty() {
            return Err(FeedError::Empty);
        }
        if skipped > 0 {
            warn!(skipped, "malformed quote rows skipped");
        }
        info!(
            quotes = quotes.len(),
            path = %path.as_ref().display(),
            "quote feed loaded"
        );
        Ok(Self { quotes, skipped })
    }

    /// Deterministic synthetic feed: mean-reverting mid-price with noisy
    /// spread and depth
    pub fn synthetic(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut mid = 100.0f64;
        let reversion_level = 100.0;
        let reversion_speed = 0.1;
        let volatility = 0.5;

        let mut quotes = Vec::with_capacity(count);
        for i in 0..count {
            mid += reversion_speed * (reversion_level - mid)
                + volatility * rng.gen_range(-1.0..1.0);
            mid = mid.max(10.0);

            let half_spread = mid * 0.00025 * rng.gen_range(0.5..1.5);
            let bid_volume = 5000.0 * rng.gen_range(0.7..1.3);
            let ask_volume = 5000.0 * rng.gen_range(0.7..1.3);

            quotes.push(Quote::new(
                i as i64 * 1_000_000,
                mid - half_spread,
                mid + half_spread,
                bid_volume,
                ask_volume,
            ));
        }
        Self { quotes, skipped: 0 }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Rows dropped while loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn parse_row(line: &str, indices: &[usize; 5]) -> Option<Quote> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let max_index = *indices.iter().max().unwrap_or(&0);
    if fields.len() <= max_index {
        return None;
    }
    Some(Quote::new(
        fields[indices[0]].parse().ok()?,
        fields[indices[1]].parse().ok()?,
        fields[indices[2]].parse().ok()?,
        fields[indices[3]].parse().ok()?,
        fields[indices[4]].parse().ok()?,
    ))
}
