//! Engine tail loop
//!
//! Mirrors the producer's orchestrator from the consuming side: announce
//! READY, wait for the producer, announce PROCESSING, then drain the
//! signal log in batches until the producer announces SHUTDOWN or an
//! interrupt arrives. The engine's own SHUTDOWN is announced on every
//! exit path.

use crate::config::EngineConfig;
use iris_core::{EngineState, ProducerState};
use iris_ipc::{ConnectionMonitor, DeliveryCounters, HandshakeOutcome, SignalReader};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Final statistics for one engine run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumeReport {
    pub counters: DeliveryCounters,
    pub malformed: u64,
    pub elapsed_secs: f64,
    pub interrupted: bool,
}

/// Drives one end-to-end engine run
pub struct Consumer {
    config: EngineConfig,
    monitor: ConnectionMonitor<EngineState, ProducerState>,
    reader: SignalReader,
}

impl Consumer {
    pub fn new(config: EngineConfig) -> Self {
        let monitor = ConnectionMonitor::new(&config.engine_status, &config.producer_status);
        let reader = SignalReader::new(&config.signal_log);
        Self {
            config,
            monitor,
            reader,
        }
    }

    pub async fn run(mut self, stop: Arc<AtomicBool>) -> anyhow::Result<ConsumeReport> {
        let result = self.consume(&stop).await;
        self.monitor.announce_lossy(EngineState::Shutdown);
        result
    }

    async fn consume(&mut self, stop: &Arc<AtomicBool>) -> anyhow::Result<ConsumeReport> {
        let started = Instant::now();
        let mut report = ConsumeReport {
            counters: DeliveryCounters::default(),
            malformed: 0,
            elapsed_secs: 0.0,
            interrupted: false,
        };

        // The engine goes first: its READY token is what unblocks the
        // producer's handshake
        self.monitor.announce(EngineState::Ready)?;

        info!(
            timeout_secs = self.config.handshake_timeout_secs,
            "waiting for producer"
        );
        match self
            .monitor
            .wait_for_peer(
                self.config.handshake_timeout(),
                self.config.poll_interval(),
                stop,
            )
            .await
        {
            HandshakeOutcome::PeerReady => info!("producer is up"),
            HandshakeOutcome::TimedOut => anyhow::bail!(
                "producer not seen after {}s; giving up",
                self.config.handshake_timeout_secs
            ),
            HandshakeOutcome::Stopped => {
                info!("interrupted while waiting for producer");
                report.interrupted = true;
                report.elapsed_secs = started.elapsed().as_secs_f64();
                return Ok(report);
            }
        }

        self.monitor.announce_lossy(EngineState::Processing);

        let mut consumed_since_report: u64 = 0;
        loop {
            if stop.load(Ordering::SeqCst) {
                info!("stop requested");
                report.interrupted = true;
                break;
            }

            let batch = match self.reader.poll() {
                Ok(batch) => batch,
                Err(e) => {
                    // Transient read failure: skip this poll, keep tailing
                    warn!(error = %e, "signal log poll failed");
                    tokio::time::sleep(self.config.tail_interval()).await;
                    continue;
                }
            };

            for signal in &batch {
                debug!(direction = %signal.direction, confidence = signal.confidence, "signal");
            }
            consumed_since_report += batch.len() as u64;
            if consumed_since_report >= self.config.progress_every {
                let counters = self.reader.counters();
                info!(
                    consumed = counters.total,
                    buy = counters.buy,
                    sell = counters.sell,
                    neutral = counters.neutral,
                    "consuming"
                );
                consumed_since_report = 0;
            }

            if batch.is_empty() {
                if self.monitor.peer_state() == Some(ProducerState::Shutdown) {
                    // One final drain so nothing appended just before the
                    // producer's shutdown announcement is lost
                    let tail = match self.reader.poll() {
                        Ok(tail) => tail,
                        Err(e) => {
                            warn!(error = %e, "final drain failed");
                            Vec::new()
                        }
                    };
                    if !tail.is_empty() {
                        debug!(drained = tail.len(), "final drain");
                    }
                    info!("producer announced shutdown; stopping");
                    break;
                }
                tokio::time::sleep(self.config.tail_interval()).await;
            }
        }

        report.counters = self.reader.counters();
        report.malformed = self.reader.malformed();
        report.elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            total = report.counters.total,
            buy = report.counters.buy,
            sell = report.counters.sell,
            neutral = report.counters.neutral,
            malformed = report.malformed,
            elapsed_secs = %format!("{:.2}", report.elapsed_secs),
            "engine run complete"
        );
        Ok(report)
    }
}
