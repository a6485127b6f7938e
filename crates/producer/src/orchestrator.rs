//! Producer main loop
//!
//! Drives the connection handshake, then streams the quote feed through
//! feature computation and prediction, emitting one signal per usable
//! quote. SHUTDOWN is announced exactly once on every exit path,
//! including error and interrupt paths.

use crate::config::ProducerConfig;
use crate::feed::QuoteFeed;
use anyhow::Context;
use iris_core::{EngineState, ProducerState};
use iris_ipc::{ConnectionMonitor, DeliveryCounters, HandshakeOutcome, SignalWriter};
use iris_signal::{FeatureStream, ModelArtifact, SignalPredictor};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Final statistics for one producer run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunReport {
    pub counters: DeliveryCounters,
    /// Quotes rejected by validity checks
    pub invalid_quotes: u64,
    /// Signals lost to append failures (logged, not retried)
    pub emit_failures: u64,
    pub elapsed_secs: f64,
    pub degraded: bool,
    pub interrupted: bool,
}

/// Drives one end-to-end producer run
pub struct Orchestrator {
    config: ProducerConfig,
    monitor: ConnectionMonitor<ProducerState, EngineState>,
    predictor: SignalPredictor,
    features: FeatureStream,
}

impl Orchestrator {
    /// Build from configuration, loading the model artifact if one is
    /// configured
    ///
    /// A configured-but-unloadable artifact is a startup failure; only a
    /// deliberately absent artifact selects the degraded random mode.
    pub fn new(config: ProducerConfig) -> anyhow::Result<Self> {
        let predictor = match &config.model_artifact {
            Some(path) => {
                let artifact = ModelArtifact::load(path)
                    .with_context(|| format!("loading model artifact {}", path.display()))?;
                info!(
                    path = %path.display(),
                    features = artifact.feature_names.len(),
                    "model artifact loaded"
                );
                SignalPredictor::with_model(Box::new(artifact), config.thresholds)
            }
            None => SignalPredictor::degraded(
                config.features.feature_names(),
                config.thresholds,
                config.degraded_seed,
            ),
        };
        Ok(Self::with_predictor(config, predictor))
    }

    /// Build with an injected predictor (tests, dry runs)
    pub fn with_predictor(config: ProducerConfig, predictor: SignalPredictor) -> Self {
        let monitor = ConnectionMonitor::new(&config.producer_status, &config.engine_status);
        let features = FeatureStream::new(config.features.clone());
        Self {
            config,
            monitor,
            predictor,
            features,
        }
    }

    /// Run to completion; the stop flag is checked cooperatively at the
    /// top of each iteration, so the in-flight quote always finishes
    pub async fn run(mut self, stop: Arc<AtomicBool>) -> anyhow::Result<RunReport> {
        if self.predictor.is_degraded() {
            warn!("DEGRADED MODE: emitting random signals, not model output");
        }
        let result = self.stream(&stop).await;
        // Terminal state on every exit path, error and interrupt included
        self.monitor.announce_lossy(ProducerState::Shutdown);
        result
    }

    async fn stream(&mut self, stop: &Arc<AtomicBool>) -> anyhow::Result<RunReport> {
        let started = Instant::now();
        let mut report = RunReport {
            counters: DeliveryCounters::default(),
            invalid_quotes: 0,
            emit_failures: 0,
            elapsed_secs: 0.0,
            degraded: self.predictor.is_degraded(),
            interrupted: false,
        };

        info!(
            timeout_secs = self.config.handshake_timeout_secs,
            "waiting for engine to become ready"
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
            HandshakeOutcome::PeerReady => info!("engine is ready"),
            HandshakeOutcome::TimedOut => anyhow::bail!(
                "engine not ready after {}s; aborting startup",
                self.config.handshake_timeout_secs
            ),
            HandshakeOutcome::Stopped => {
                info!("interrupted while waiting for engine");
                report.interrupted = true;
                report.elapsed_secs = started.elapsed().as_secs_f64();
                return Ok(report);
            }
        }

        self.monitor.announce_lossy(ProducerState::Running);

        let feed = self.load_feed()?;
        info!(quotes = feed.len(), "quote feed ready; starting to stream");

        self.monitor.announce_lossy(ProducerState::Sending);
        // The log is created only now: a failed handshake never leaves a
        // stale signal file behind
        let mut writer = SignalWriter::create(&self.config.signal_log)
            .with_context(|| format!("creating signal log {}", self.config.signal_log.display()))?;

        let mut last_report = Instant::now();
        let mut since_report: u64 = 0;

        for quote in feed.quotes() {
            if stop.load(Ordering::SeqCst) {
                info!("stop requested; finishing run");
                report.interrupted = true;
                break;
            }

            if !quote.is_valid() {
                report.invalid_quotes += 1;
                debug!(timestamp = quote.timestamp, "invalid quote skipped");
                continue;
            }

            let features = self.features.ingest(quote);
            let signal = self.predictor.predict(&features);

            match writer.emit(&signal) {
                Ok(()) => since_report += 1,
                Err(e) => {
                    // Transient I/O failure: this signal is lost, the
                    // stream continues
                    report.emit_failures += 1;
                    warn!(error = %e, "signal append failed");
                }
            }

            if since_report >= self.config.progress_every
                || last_report.elapsed() >= self.config.progress_interval()
            {
                let counters = writer.counters();
                let rate = counters.total as f64 / started.elapsed().as_secs_f64().max(1e-9);
                info!(
                    emitted = counters.total,
                    buy = counters.buy,
                    sell = counters.sell,
                    neutral = counters.neutral,
                    rate_per_sec = %format!("{:.1}", rate),
                    last = %signal.direction,
                    "streaming"
                );
                last_report = Instant::now();
                since_report = 0;
            }

            if let Some(delay) = self.config.signal_delay() {
                tokio::time::sleep(delay).await;
            }
        }

        report.counters = writer.counters();
        report.elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            total = report.counters.total,
            buy = report.counters.buy,
            sell = report.counters.sell,
            neutral = report.counters.neutral,
            invalid_quotes = report.invalid_quotes,
            emit_failures = report.emit_failures,
            elapsed_secs = %format!("{:.2}", report.elapsed_secs),
            "run complete"
        );
        Ok(report)
    }

    fn load_feed(&self) -> anyhow::Result<QuoteFeed> {
        match (&self.config.quote_feed, self.config.synthetic_quotes) {
            (Some(path), _) => QuoteFeed::from_csv(path)
                .with_context(|| format!("loading quote feed {}", path.display())),
            (None, Some(count)) => {
                info!(count, seed = self.config.synthetic_seed, "using synthetic quote feed");
                Ok(QuoteFeed::synthetic(count, self.config.synthetic_seed))
            }
            (None, None) => {
                anyhow::bail!("no quote source configured (set quote_feed or synthetic_quotes)")
            }
        }
    }
}
