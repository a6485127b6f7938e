//! Engine process (signal consumer)
//!
//! Announces readiness over its status slot, waits for the producer, then
//! tails the shared signal log from a cursor it owns. When the producer
//! announces SHUTDOWN the engine performs one final drain and exits.

pub mod config;
pub mod consumer;

pub use config::EngineConfig;
pub use consumer::{ConsumeReport, Consumer};
