//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shared signal log the producer appends to
    pub signal_log: PathBuf,
    /// Status slot this process owns
    pub engine_status: PathBuf,
    /// Status slot the producer owns
    pub producer_status: PathBuf,

    /// Bounded wait for the producer before giving up
    pub handshake_timeout_secs: u64,
    /// Producer status poll cadence during the handshake
    pub poll_interval_ms: u64,
    /// Signal log tail cadence once processing
    pub tail_interval_ms: u64,

    /// Progress report every N consumed signals
    pub progress_every: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal_log: PathBuf::from("ipc/signals.txt"),
            engine_status: PathBuf::from("ipc/engine_status.txt"),
            producer_status: PathBuf::from("ipc/producer_status.txt"),
            handshake_timeout_secs: 60,
            poll_interval_ms: 500,
            tail_interval_ms: 50,
            progress_every: 200,
        }
    }
}

impl EngineConfig {
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

    pub fn tail_interval(&self) -> Duration {
        Duration::from_millis(self.tail_interval_ms.max(1))
    }

    /// Root all ipc paths under a directory (CLI convenience)
    pub fn with_ipc_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.signal_log = dir.join("signals.txt");
        self.engine_status = dir.join("engine_status.txt");
        self.producer_status = dir.join("producer_status.txt");
        self
    }
}
