pub mod live;
pub mod status;
pub mod tournament;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig,
    dao::tournament_store::TournamentStore,
    error::ServiceError,
    state::{
        live::{Change, SessionRegistry, UpdateNotifier},
        status::StatusMachine,
    },
};

pub type SharedState = Arc<AppState>;

/// Central application state: storage handle, live viewer sessions and configuration.
pub struct AppState {
    store: RwLock<Option<Arc<dyn TournamentStore>>>,
    degraded: watch::Sender<bool>,
    sessions: Arc<SessionRegistry>,
    notifier: UpdateNotifier,
    statuses: StatusMachine,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Spawns the live update worker, so this must run inside a Tokio runtime. The
    /// application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let sessions = Arc::new(SessionRegistry::new());
        let (notifier, _worker) =
            UpdateNotifier::spawn(sessions.clone(), config.notifier_queue_capacity());

        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            sessions,
            notifier,
            statuses: StatusMachine::new(config.status_transitions()),
            config: Arc::new(config),
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn TournamentStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store or [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn TournamentStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn TournamentStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Registry of connected live viewers.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Request one live broadcast for `change` without waiting for it.
    pub fn notify(&self, change: Change) {
        self.notifier.notify(change);
    }

    pub fn statuses(&self) -> &StatusMachine {
        &self.statuses
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
