//! End-to-end producer scenarios over a real temp filesystem

use iris_core::{EngineState, StatusToken};
use iris_ipc::StatusStore;
use iris_producer::{Orchestrator, ProducerConfig};
use iris_signal::{ConstantModel, SignalPredictor, ThresholdPolicy};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn test_config(dir: &Path) -> ProducerConfig {
    ProducerConfig {
        synthetic_quotes: Some(150),
        handshake_timeout_secs: 5,
        poll_interval_ms: 10,
        ..ProducerConfig::default().with_ipc_dir(dir)
    }
}

fn stub_predictor(probability: f64, config: &ProducerConfig) -> SignalPredictor {
    SignalPredictor::with_model(
        Box::new(ConstantModel::new(
            probability,
            config.features.feature_names(),
        )),
        ThresholdPolicy::default(),
    )
}

#[tokio::test]
async fn emits_one_signal_per_quote_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // Engine already waiting
    StatusStore::new(&config.engine_status)
        .write(EngineState::Ready.token())
        .unwrap();

    let predictor = stub_predictor(0.9, &config);
    let orchestrator = Orchestrator::with_predictor(config.clone(), predictor);
    let report = orchestrator
        .run(Arc::new(AtomicBool::new(false)))
        .await
        .unwrap();

    assert_eq!(report.counters.total, 150);
    assert_eq!(report.counters.buy, 150);
    assert_eq!(report.counters.sell, 0);
    assert_eq!(report.counters.neutral, 0);
    assert_eq!(report.invalid_quotes, 0);
    assert_eq!(report.emit_failures, 0);
    assert!(!report.interrupted);

    // The report serializes for structured run summaries
    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["counters"]["total"], 150);
    assert_eq!(json["degraded"], false);

    let contents = std::fs::read_to_string(&config.signal_log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 150);
    for line in lines {
        assert_eq!(line, "1,0.9000");
    }

    // Terminal state reached
    assert_eq!(
        StatusStore::new(&config.producer_status).read(),
        Some("SHUTDOWN".to_string())
    );
}

#[tokio::test]
async fn dead_zone_probability_yields_all_neutral() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    StatusStore::new(&config.engine_status)
        .write(EngineState::Processing.token())
        .unwrap();

    let predictor = stub_predictor(0.55, &config);
    let orchestrator = Orchestrator::with_predictor(config.clone(), predictor);
    let report = orchestrator
        .run(Arc::new(AtomicBool::new(false)))
        .await
        .unwrap();

    assert_eq!(report.counters.total, 150);
    assert_eq!(report.counters.neutral, 150);
    assert_eq!(report.counters.buy, 0);
}

#[tokio::test]
async fn handshake_timeout_aborts_without_signal_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.handshake_timeout_secs = 1;
    config.poll_interval_ms = 50;

    // No engine status slot is ever created
    let predictor = stub_predictor(0.9, &config);
    let orchestrator = Orchestrator::with_predictor(config.clone(), predictor);
    let result = orchestrator.run(Arc::new(AtomicBool::new(false))).await;

    assert!(result.is_err());
    // SENDING never happened: no signal log was created
    assert!(!config.signal_log.exists());
    // SHUTDOWN still announced on the failure path
    assert_eq!(
        StatusStore::new(&config.producer_status).read(),
        Some("SHUTDOWN".to_string())
    );
}

#[tokio::test]
async fn interrupt_during_handshake_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let predictor = stub_predictor(0.9, &config);
    let orchestrator = Orchestrator::with_predictor(config.clone(), predictor);
    let report = orchestrator
        .run(Arc::new(AtomicBool::new(true)))
        .await
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.counters.total, 0);
    assert!(!config.signal_log.exists());
    assert_eq!(
        StatusStore::new(&config.producer_status).read(),
        Some("SHUTDOWN".to_string())
    );
}

#[tokio::test]
async fn degraded_mode_still_delivers_every_quote() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    StatusStore::new(&config.engine_status)
        .write(EngineState::Ready.token())
        .unwrap();

    let predictor = SignalPredictor::degraded(
        config.features.feature_names(),
        ThresholdPolicy::default(),
        Some(7),
    );
    let orchestrator = Orchestrator::with_predictor(config.clone(), predictor);
    let report = orchestrator
        .run(Arc::new(AtomicBool::new(false)))
        .await
        .unwrap();

    assert!(report.degraded);
    assert_eq!(report.counters.total, 150);
    assert_eq!(
        report.counters.buy + report.counters.sell + report.counters.neutral,
        150
    );
}
