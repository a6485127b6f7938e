//! Connection status tokens
//!
//! Each process owns a single status slot and overwrites it with one of
//! its tokens on every transition; the peer only ever reads it. The token
//! sets are asymmetric: the producer walks a one-directional state machine
//! while the engine reports readiness to consume.

/// A status value that can be written to / parsed from a status slot
pub trait StatusToken: Sized + Copy {
    /// The wire token for this state (single line, no whitespace)
    fn token(&self) -> &'static str;

    /// Strict parse; `None` for unrecognized tokens
    fn from_token(token: &str) -> Option<Self>;

    /// Whether a peer observing this state may treat us as ready
    fn is_ready(&self) -> bool;
}

/// Producer-side connection state machine
///
/// Transitions are one-directional:
/// `Uninitialized -> Running -> Sending -> Shutdown`, with `Shutdown`
/// reachable from every prior state on any exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    /// Not yet announced anything
    Uninitialized,
    /// Handshake completed, preparing to stream
    Running,
    /// Actively emitting signals
    Sending,
    /// Terminal
    Shutdown,
}

impl StatusToken for ProducerState {
    fn token(&self) -> &'static str {
        match self {
            ProducerState::Uninitialized => "UNINITIALIZED",
            ProducerState::Running => "RUNNING",
            ProducerState::Sending => "SENDING",
            ProducerState::Shutdown => "SHUTDOWN",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "UNINITIALIZED" => Some(ProducerState::Uninitialized),
            "RUNNING" => Some(ProducerState::Running),
            "SENDING" => Some(ProducerState::Sending),
            "SHUTDOWN" => Some(ProducerState::Shutdown),
            _ => None,
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, ProducerState::Running | ProducerState::Sending)
    }
}

/// Engine-side (consumer) connection state
///
/// An unknown engine state is the absence of a readable slot and is
/// represented as `None` at the monitor level, never as a written token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Ready to start consuming signals
    Ready,
    /// Actively tailing the signal log
    Processing,
    /// Terminal
    Shutdown,
}

impl StatusToken for EngineState {
    fn token(&self) -> &'static str {
        match self {
            EngineState::Ready => "READY",
            EngineState::Processing => "PROCESSING",
            EngineState::Shutdown => "SHUTDOWN",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "READY" => Some(EngineState::Ready),
            "PROCESSING" => Some(EngineState::Processing),
            "SHUTDOWN" => Some(EngineState::Shutdown),
            _ => None,
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready | EngineState::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_ready_set() {
        assert!(!ProducerState::Uninitialized.is_ready());
        assert!(ProducerState::Running.is_ready());
        assert!(ProducerState::Sending.is_ready());
        assert!(!ProducerState::Shutdown.is_ready());
    }

    #[test]
    fn test_engine_ready_set() {
        assert!(EngineState::Ready.is_ready());
        assert!(EngineState::Processing.is_ready());
        assert!(!EngineState::Shutdown.is_ready());
    }

    #[test]
    fn test_token_round_trip() {
        for state in [
            ProducerState::Uninitialized,
            ProducerState::Running,
            ProducerState::Sending,
            ProducerState::Shutdown,
        ] {
            assert_eq!(ProducerState::from_token(state.token()), Some(state));
        }
        for state in [
            EngineState::Ready,
            EngineState::Processing,
            EngineState::Shutdown,
        ] {
            assert_eq!(EngineState::from_token(state.token()), Some(state));
        }
        assert_eq!(ProducerState::from_token("running"), None);
        assert_eq!(EngineState::from_token(""), None);
    }
}
