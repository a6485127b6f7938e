//! Producer configuration
//!
//! Every hand-tuned constant (poll cadence, handshake timeout,
//! thresholds, horizons) is configuration here, loadable from a JSON
//! file with per-field defaults.

use iris_signal::{FeatureConfig, ThresholdPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Shared signal log the engine tails
    pub signal_log: PathBuf,
    /// Status slot this process owns
    pub producer_status: PathBuf,
    /// Status slot the engine owns
    pub engine_status: PathBuf,

    /// CSV quote feed; when absent a synthetic feed may be configured
    pub quote_feed: Option<PathBuf>,
    /// Number of synthetic quotes to generate when no feed file is given
    pub synthetic_quotes: Option<usize>,
    /// Seed for the synthetic feed
    pub synthetic_seed: u64,

    /// JSON model artifact; absence selects the degraded random mode
    pub model_artifact: Option<PathBuf>,
    /// Seed for the degraded mode (entropy-seeded when absent)
    pub degraded_seed: Option<u64>,

    /// Bounded handshake wait before aborting startup
    pub handshake_timeout_secs: u64,
    /// Peer status poll cadence during the handshake
    pub poll_interval_ms: u64,
    /// Optional fixed per-signal delay to simulate real-time pacing
    pub signal_delay_ms: u64,

    /// Progress report every N signals ...
    pub progress_every: u64,
    /// ... or every T seconds, whichever comes first
    pub progress_interval_secs: u64,

    pub features: FeatureConfig,
    pub thresholds: ThresholdPolicy,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            signal_log: PathBuf::from("ipc/signals.txt"),
            producer_status: PathBuf::from("ipc/producer_status.txt"),
            engine_status: PathBuf::from("ipc/engine_status.txt"),
            quote_feed: None,
            synthetic_quotes: None,
            synthetic_seed: 42,
            model_artifact: None,
            degraded_seed: None,
            handshake_timeout_secs: 60,
            poll_interval_ms: 500,
            signal_delay_ms: 0,
            progress_every: 200,
            progress_interval_secs: 5,
            features: FeatureConfig::default(),
            thresholds: ThresholdPolicy::default(),
        }
    }
}

impl ProducerConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn signal_delay(&self) -> Option<Duration> {
        (self.signal_delay_ms > 0).then(|| Duration::from_millis(self.signal_delay_ms))
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs.max(1))
    }

    /// Root all ipc paths under a directory (CLI convenience)
    pub fn with_ipc_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.signal_log = dir.join("signals.txt");
        self.producer_status = dir.join("producer_status.txt");
        self.engine_status = dir.join("engine_status.txt");
        self
    }
}
