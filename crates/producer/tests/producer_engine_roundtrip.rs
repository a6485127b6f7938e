//! Both processes in one test: the engine tails what the producer emits

use iris_engine::{Consumer, EngineConfig};
use iris_producer::{Orchestrator, ProducerConfig};
use iris_signal::{ConstantModel, SignalPredictor, ThresholdPolicy};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

#[tokio::test]
async fn engine_receives_every_emitted_signal() {
    let dir = tempfile::tempdir().unwrap();

    let producer_config = ProducerConfig {
        synthetic_quotes: Some(150),
        handshake_timeout_secs: 10,
        poll_interval_ms: 10,
        ..ProducerConfig::default().with_ipc_dir(dir.path())
    };
    let engine_config = EngineConfig {
        handshake_timeout_secs: 10,
        poll_interval_ms: 10,
        tail_interval_ms: 5,
        ..EngineConfig::default().with_ipc_dir(dir.path())
    };

    let predictor = SignalPredictor::with_model(
        Box::new(ConstantModel::new(
            0.9,
            producer_config.features.feature_names(),
        )),
        ThresholdPolicy::default(),
    );

    let engine = tokio::spawn(Consumer::new(engine_config).run(Arc::new(AtomicBool::new(false))));
    let producer = tokio::spawn(
        Orchestrator::with_predictor(producer_config, predictor)
            .run(Arc::new(AtomicBool::new(false))),
    );

    let produced = producer.await.unwrap().unwrap();
    let consumed = engine.await.unwrap().unwrap();

    assert_eq!(produced.counters.total, 150);
    assert_eq!(consumed.counters.total, 150);
    assert_eq!(consumed.counters.buy, 150);
    assert_eq!(consumed.malformed, 0);
    assert!(!consumed.interrupted);
}
