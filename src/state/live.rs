//! Live viewer fan-out: the session registry and the queue-backed notifier that drives it.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::{
    sync::{
        Mutex,
        mpsc::{self, error::TrySendError},
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifier handed out to every registered viewer session.
pub type SessionId = Uuid;

/// Text frame a viewer sends to check the connection.
pub const KEEPALIVE_PROBE: &str = "ping";
/// Fixed reply to [`KEEPALIVE_PROBE`].
pub const KEEPALIVE_ACK: &str = "pong";

/// Signal pushed to viewers. Carries no payload: viewers re-fetch the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSignal {
    /// Something changed; query the standings again.
    Changed,
}

impl LiveSignal {
    pub fn as_text(self) -> &'static str {
        match self {
            LiveSignal::Changed => "update",
        }
    }
}

/// Kind of mutation that triggered a notification. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Team,
    Player,
    Match,
    HoleResults,
    MatchStatus,
}

/// Raised by a sink whose viewer is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("viewer session closed")]
pub struct SessionClosed;

/// Outbound half of a viewer session, independent of the transport carrying it.
pub trait ViewerSink: Send + Sync {
    /// Hand the signal to the transport without waiting on the network.
    fn deliver(&self, signal: LiveSignal) -> Result<(), SessionClosed>;
}

impl ViewerSink for mpsc::UnboundedSender<LiveSignal> {
    fn deliver(&self, signal: LiveSignal) -> Result<(), SessionClosed> {
        self.send(signal).map_err(|_| SessionClosed)
    }
}

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sessions the signal was handed to.
    pub delivered: usize,
    /// Sessions whose send failed and that were dropped from the registry.
    pub removed: usize,
}

/// Registry of connected viewer sessions guarded by a single lock.
///
/// `register`, `deregister` and `broadcast` each run entirely under that lock, so a
/// broadcast never observes a half-registered session. A long broadcast delays
/// connects and disconnects until it finishes.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Box<dyn ViewerSink>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session and return the identifier used to remove it later.
    pub async fn register<S>(&self, sink: S) -> SessionId
    where
        S: ViewerSink + 'static,
    {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, Box::new(sink));
        debug!(session_id = %id, sessions = sessions.len(), "viewer session registered");
        id
    }

    /// Remove a session. Returns `false` when it was already gone (e.g. dropped by a failed send).
    pub async fn deregister(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(&id).is_some();
        if removed {
            debug!(session_id = %id, sessions = sessions.len(), "viewer session deregistered");
        }
        removed
    }

    /// Send `signal` to every registered session, dropping the ones whose send fails.
    /// Failed sends are not retried.
    pub async fn broadcast(&self, signal: LiveSignal) -> BroadcastReport {
        let mut sessions = self.sessions.lock().await;
        let mut report = BroadcastReport::default();

        sessions.retain(|id, sink| match sink.deliver(signal) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "dropping viewer session after failed send");
                report.removed += 1;
                false
            }
        });

        report
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

/// Handle used by commands to request a broadcast without waiting for it.
///
/// Requests go through a bounded queue drained by a single worker. When the queue is
/// full a broadcast is already pending and will reach every viewer after the change,
/// so the request is folded into it.
#[derive(Clone)]
pub struct UpdateNotifier {
    queue: mpsc::Sender<Change>,
}

impl UpdateNotifier {
    /// Start the fan-out worker for `registry`. The worker stops once every notifier
    /// clone has been dropped.
    pub fn spawn(registry: Arc<SessionRegistry>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (queue, mut requests) = mpsc::channel::<Change>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(change) = requests.recv().await {
                let report = registry.broadcast(LiveSignal::Changed).await;
                debug!(
                    change = ?change,
                    delivered = report.delivered,
                    removed = report.removed,
                    "live update broadcast"
                );
            }
            info!("live update worker stopped");
        });

        (Self { queue }, worker)
    }

    /// Queue one broadcast for `change`. Never blocks.
    pub fn notify(&self, change: Change) {
        match self.queue.try_send(change) {
            Ok(()) => {}
            Err(TrySendError::Full(change)) => {
                debug!(change = ?change, "live update queue full; folded into pending broadcast");
            }
            Err(TrySendError::Closed(change)) => {
                warn!(change = ?change, "live update worker is gone; notification dropped");
            }
        }
    }
}
