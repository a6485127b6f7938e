//! Connection handshake between producer and engine
//!
//! Built on two status slots, one per direction. Each side announces its
//! own state and polls the peer's slot until the peer reports a ready
//! state or a bounded timeout elapses. There is no retry once streaming
//! has begun; a lost peer is only discovered through its status slot.

use crate::error::IpcResult;
use crate::status::StatusStore;
use iris_core::StatusToken;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a bounded wait for the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// Peer reported a ready state
    PeerReady,
    /// Bounded wait elapsed without the peer becoming ready
    TimedOut,
    /// The cooperative stop flag was set while waiting
    Stopped,
}

/// Handshake state machine over two status slots
///
/// `Own` is the token type this side writes; `Peer` is the token type it
/// reads. Each slot has exactly one writer (its owning process).
pub struct ConnectionMonitor<Own: StatusToken, Peer: StatusToken> {
    own: StatusStore,
    peer: StatusStore,
    _marker: PhantomData<(Own, Peer)>,
}

impl<Own: StatusToken, Peer: StatusToken> ConnectionMonitor<Own, Peer> {
    pub fn new(own_path: impl Into<PathBuf>, peer_path: impl Into<PathBuf>) -> Self {
        Self {
            own: StatusStore::new(own_path),
            peer: StatusStore::new(peer_path),
            _marker: PhantomData,
        }
    }

    /// Durably record this side's state (overwrite semantics)
    pub fn announce(&self, state: Own) -> IpcResult<()> {
        self.own.write(state.token())?;
        info!(state = state.token(), "connection status announced");
        Ok(())
    }

    /// Like [`announce`](Self::announce) but never fails the caller
    ///
    /// Status write failures are transient I/O errors: logged, then treated
    /// as a no-op for that call.
    pub fn announce_lossy(&self, state: Own) {
        if let Err(e) = self.announce(state) {
            warn!(state = state.token(), error = %e, "status announce failed");
        }
    }

    /// The peer's last recorded state
    ///
    /// `None` when the peer's slot is missing, unreadable, or holds an
    /// unrecognized token, all treated as "unknown / not ready".
    pub fn peer_state(&self) -> Option<Peer> {
        let raw = self.peer.read()?;
        match Peer::from_token(&raw) {
            Some(state) => Some(state),
            None => {
                debug!(token = %raw, "unrecognized peer status token");
                None
            }
        }
    }

    /// True iff the peer's last recorded state is in its ready set
    pub fn is_peer_ready(&self) -> bool {
        self.peer_state().map(|s| s.is_ready()).unwrap_or(false)
    }

    /// True iff the peer's slot exists and holds a recognized token
    pub fn is_peer_connected(&self) -> bool {
        self.peer.exists() && self.peer_state().is_some()
    }

    /// Poll until the peer is ready, the timeout elapses, or `stop` is set
    ///
    /// The poll interval and timeout are configuration, not policy; typical
    /// values are 500ms / 60s.
    pub async fn wait_for_peer(
        &self,
        timeout: Duration,
        poll_interval: Duration,
        stop: &Arc<AtomicBool>,
    ) -> HandshakeOutcome {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut polls: u64 = 0;

        loop {
            if stop.load(Ordering::SeqCst) {
                return HandshakeOutcome::Stopped;
            }
            if self.is_peer_ready() {
                return HandshakeOutcome::PeerReady;
            }
            if tokio::time::Instant::now() >= deadline {
                return HandshakeOutcome::TimedOut;
            }

            polls += 1;
            if polls % 10 == 0 {
                info!(
                    waited_secs = polls * poll_interval.as_millis() as u64 / 1000,
                    "still waiting for peer"
                );
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// The slot this side writes
    pub fn own_slot(&self) -> &StatusStore {
        &self.own
    }

    /// The slot this side reads
    pub fn peer_slot(&self) -> &StatusStore {
        &self.peer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iris_core::{EngineState, ProducerState};
    use std::fs;
    use tempfile::tempdir;

    type ProducerMonitor = ConnectionMonitor<ProducerState, EngineState>;

    fn monitor(dir: &std::path::Path) -> ProducerMonitor {
        ConnectionMonitor::new(dir.join("producer_status.txt"), dir.join("engine_status.txt"))
    }

    #[test]
    fn test_not_ready_before_peer_writes() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());

        assert!(!m.is_peer_ready());
        assert!(!m.is_peer_connected());
        assert_eq!(m.peer_state(), None);
    }

    #[test]
    fn test_peer_ready_after_token_written() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());

        StatusStore::new(dir.path().join("engine_status.txt"))
            .write(EngineState::Ready.token())
            .unwrap();
        assert!(m.is_peer_ready());
        assert_eq!(m.peer_state(), Some(EngineState::Ready));

        StatusStore::new(dir.path().join("engine_status.txt"))
            .write(EngineState::Shutdown.token())
            .unwrap();
        assert!(!m.is_peer_ready());
        assert!(m.is_peer_connected());
    }

    #[test]
    fn test_deleting_peer_slot_disconnects() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());
        let peer_path = dir.path().join("engine_status.txt");

        StatusStore::new(&peer_path)
            .write(EngineState::Processing.token())
            .unwrap();
        assert!(m.is_peer_connected());

        fs::remove_file(&peer_path).unwrap();
        assert!(!m.is_peer_connected());
        assert!(!m.is_peer_ready());
    }

    #[test]
    fn test_garbage_token_is_unknown() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());

        StatusStore::new(dir.path().join("engine_status.txt"))
            .write("NOT_A_STATE")
            .unwrap();
        assert_eq!(m.peer_state(), None);
        assert!(!m.is_peer_ready());
        assert!(!m.is_peer_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_peer_times_out() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());
        let stop = Arc::new(AtomicBool::new(false));

        let outcome = m
            .wait_for_peer(Duration::from_secs(2), Duration::from_millis(100), &stop)
            .await;
        assert_eq!(outcome, HandshakeOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_peer_observes_stop_flag() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());
        let stop = Arc::new(AtomicBool::new(true));

        let outcome = m
            .wait_for_peer(Duration::from_secs(60), Duration::from_millis(100), &stop)
            .await;
        assert_eq!(outcome, HandshakeOutcome::Stopped);
    }

    #[tokio::test]
    async fn test_wait_for_peer_returns_ready_immediately() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());

        StatusStore::new(dir.path().join("engine_status.txt"))
            .write(EngineState::Ready.token())
            .unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let outcome = m
            .wait_for_peer(Duration::from_secs(1), Duration::from_millis(10), &stop)
            .await;
        assert_eq!(outcome, HandshakeOutcome::PeerReady);
    }

    #[test]
    fn test_announce_writes_own_slot() {
        let dir = tempdir().unwrap();
        let m = monitor(dir.path());

        m.announce(ProducerState::Running).unwrap();
        assert_eq!(m.own_slot().read(), Some("RUNNING".to_string()));
        m.announce_lossy(ProducerState::Shutdown);
        assert_eq!(m.own_slot().read(), Some("SHUTDOWN".to_string()));
    }
}
