//! App core for Shelfmark.
//!
//! Central struct wiring the local backend into the session gate and the
//! bookmark sync core, managing application lifecycle.

use std::sync::Arc;

use crate::backend::{Database, FeedHub, LocalAuth, LocalStore};
use crate::managers::session_gate::SessionGate;
use crate::managers::sync_core::BookmarkSyncCore;
use crate::types::errors::SyncError;
use crate::types::principal::Principal;

/// Central application struct holding the backend, gate, and sync core.
pub struct App {
    pub db: Arc<Database>,
    pub feed: Arc<FeedHub>,
    pub auth: Arc<LocalAuth>,
    pub store: Arc<LocalStore>,
    pub gate: SessionGate,
    pub core: Arc<BookmarkSyncCore>,
}

impl App {
    /// Creates an App backed by a database file at the given path.
    pub fn open(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::build(db))
    }

    /// Creates an App backed by an in-memory database. Useful for tests and
    /// the demo binary; state is discarded on drop.
    pub fn open_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self::build(db))
    }

    fn build(db: Arc<Database>) -> Self {
        let feed = Arc::new(FeedHub::new());
        let auth = Arc::new(LocalAuth::new());
        let store = Arc::new(LocalStore::new(db.clone(), feed.clone()));
        let gate = SessionGate::new(auth.clone());
        let core = Arc::new(BookmarkSyncCore::new(store.clone(), feed.clone()));

        Self {
            db,
            feed,
            auth,
            store,
            gate,
            core,
        }
    }

    /// Startup sequence: resolve the session through the gate and bind the
    /// core to the resolved principal. Fails fast with `Unauthenticated`
    /// when no session is active, and with `SessionUnavailable` when the
    /// provider cannot be reached (fail closed — no bookmark operation runs
    /// on an unresolved session).
    pub async fn startup(&self) -> Result<Principal, SyncError> {
        let principal = match self.gate.current_principal().await {
            Ok(Some(principal)) => principal,
            Ok(None) => return Err(SyncError::Unauthenticated),
            Err(err) => return Err(SyncError::SessionUnavailable(err.to_string())),
        };
        self.core.initialize(principal.clone()).await?;
        Ok(principal)
    }

    /// Shutdown sequence: release the core's subscription and end the session.
    pub async fn shutdown(&self) {
        self.core.teardown();
        if let Err(err) = self.gate.sign_out().await {
            tracing::warn!(error = %err, "sign-out during shutdown failed");
        }
    }
}
