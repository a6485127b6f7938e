//! Filesystem transport between the signal producer and the engine
//!
//! Two independently started processes coordinate with no shared memory and
//! no sockets. Each side owns exactly one durable status slot (single
//! writer, any number of readers) and the producer owns an append-only
//! signal log that the engine tails. Every write is flushed and fsynced
//! before the call returns, so a peer never observes a partial record.

pub mod channel;
pub mod error;
pub mod monitor;
pub mod status;

pub use channel::{DeliveryCounters, SignalReader, SignalWriter};
pub use error::IpcError;
pub use monitor::{ConnectionMonitor, HandshakeOutcome};
pub use status::StatusStore;
