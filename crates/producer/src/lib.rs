//! Signal producer process
//!
//! Waits for the engine over the status-slot handshake, then streams the
//! quote feed through online feature computation and the model, emitting
//! one signal per usable quote to the shared signal log.

pub mod config;
pub mod feed;
pub mod orchestrator;

pub use config::ProducerConfig;
pub use feed::{FeedError, QuoteFeed};
pub use orchestrator::{Orchestrator, RunReport};
