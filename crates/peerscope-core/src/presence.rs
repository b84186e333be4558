//! Throttled presence projection
//!
//! ```text
//! SDK presence callback ──► mpsc ──► projector task ──► watch<ViewPeerState>
//!        (any rate)                  ThrottleWindow         (≤ 1 per window)
//! ```
//!
//! [`PresenceFeed`] owns both ends: the SDK registration and the projector
//! task. Stopping the feed (or dropping it) unregisters the callback,
//! aborts the task, which discards any snapshot still waiting for its
//! window, and resets the projected state to empty.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::instance::SyncInstance;
use crate::observer::ObserverSlot;
use crate::throttle::{Offer, ThrottleWindow};
use crate::types::{Peer, PresenceSnapshot};

/// Minimum spacing between projected presence updates
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(500);

/// What the peer list renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewPeerState {
    /// Remote peers, in SDK order
    pub peers: Vec<Peer>,
    pub local_peer: Option<Peer>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ViewPeerState {
    /// Initial state while waiting for the first snapshot
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    /// Terminal state after a failed registration: not loading, empty list
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    fn from_snapshot(snapshot: PresenceSnapshot) -> Self {
        Self {
            peers: snapshot.remote_peers,
            local_peer: Some(snapshot.local_peer),
            is_loading: false,
            error: None,
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

/// A running presence subscription with throttled projection.
pub struct PresenceFeed {
    observer: ObserverSlot,
    task: Option<JoinHandle<()>>,
    state_tx: watch::Sender<ViewPeerState>,
    state_rx: watch::Receiver<ViewPeerState>,
}

impl PresenceFeed {
    /// Subscribe to `instance` presence and start projecting.
    ///
    /// Must be called from within a tokio runtime. Registration failures do
    /// not propagate: the feed starts in [`ViewPeerState::failed`].
    pub fn start(instance: &dyn SyncInstance, window: Duration) -> Self {
        let (state_tx, state_rx) = watch::channel(ViewPeerState::loading());
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

        let mut observer = ObserverSlot::new();
        let registered = observer.subscribe(Some(instance), move |snapshot| {
            // Receiver gone means the feed is shutting down
            let _ = snapshot_tx.send(snapshot);
        });

        match registered {
            Ok(_) => {
                let task = tokio::spawn(project(snapshot_rx, state_tx.clone(), window));
                Self {
                    observer,
                    task: Some(task),
                    state_tx,
                    state_rx,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up presence observer");
                state_tx.send_replace(ViewPeerState::failed(e.to_string()));
                Self {
                    observer,
                    task: None,
                    state_tx,
                    state_rx,
                }
            }
        }
    }

    /// Latest projected state
    pub fn state(&self) -> ViewPeerState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every projected change
    pub fn subscribe(&self) -> watch::Receiver<ViewPeerState> {
        self.state_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.observer.is_subscribed()
    }

    /// Unregister from the SDK, cancel any pending emission and clear the
    /// projected state. Idempotent. A failed feed keeps its error.
    pub fn stop(&mut self) {
        self.observer.stop();
        if let Some(task) = self.task.take() {
            task.abort();
            self.state_tx.send_replace(ViewPeerState::default());
            tracing::debug!("Presence projector stopped");
        }
    }
}

impl Drop for PresenceFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn project(
    mut snapshots: mpsc::UnboundedReceiver<PresenceSnapshot>,
    state_tx: watch::Sender<ViewPeerState>,
    window: Duration,
) {
    let mut throttle = ThrottleWindow::new(window);

    loop {
        let deadline = throttle.deadline();
        tokio::select! {
            received = snapshots.recv() => {
                let Some(snapshot) = received else {
                    break;
                };
                tracing::trace!(remote_peers = snapshot.remote_peers.len(), "Presence graph update");
                if let Offer::Emit(snapshot) = throttle.offer(Instant::now(), snapshot) {
                    publish(&state_tx, snapshot);
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(snapshot) = throttle.poll(Instant::now()) {
                    publish(&state_tx, snapshot);
                }
            }
        }
    }
}

fn publish(state_tx: &watch::Sender<ViewPeerState>, snapshot: PresenceSnapshot) {
    let state = ViewPeerState::from_snapshot(snapshot);
    tracing::debug!(peer_count = state.peer_count(), "Projected presence state");
    state_tx.send_replace(state);
}
