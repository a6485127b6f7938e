//! Iris Core Domain
//!
//! Pure domain types shared by the signal producer and the engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod quote;
pub mod signal;
pub mod stats;
pub mod status;

// Re-export commonly used types at crate root
pub use quote::Quote;
pub use signal::{Signal, SignalDirection};
pub use stats::RollingWindow;
pub use status::{EngineState, ProducerState, StatusToken};
