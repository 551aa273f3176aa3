//! Shared access to the current session.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use bloodbridge_core::AppError;
use bloodbridge_core::result::AppResult;
use bloodbridge_entity::{Donor, DonorStats, Session};

use super::store::{MemorySessionStore, SessionStore};

/// Notice shown when an action needs a logged-in donor.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login as a donor to respond to blood requests";

/// Owns the in-memory session and mirrors every change to a [`SessionStore`].
///
/// The in-memory copy is authoritative. A failed write to the store is
/// logged and otherwise ignored, so a read-only disk never blocks a
/// donation from being recorded.
#[derive(Debug, Clone)]
pub struct SessionManager {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Manager backed by a [`MemorySessionStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Load the persisted session into memory. An unreadable store is
    /// treated as logged out.
    pub async fn restore(&self) -> Option<Session> {
        let loaded = match self.store.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                None
            }
        };
        *self.current.write().await = loaded.clone();
        loaded
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn donor(&self) -> Option<Donor> {
        self.current.read().await.as_ref().map(|s| s.donor.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// The session, or an authentication error when logged out.
    pub async fn require(&self) -> AppResult<Session> {
        self.current()
            .await
            .ok_or_else(|| AppError::authentication(LOGIN_REQUIRED_MESSAGE))
    }

    /// Install a freshly authenticated session.
    pub async fn establish(&self, session: Session) {
        info!(donor_id = %session.donor.id, "Session established");
        self.persist(&session).await;
        *self.current.write().await = Some(session);
    }

    /// Overwrite the donor's donation counters with the server's values.
    /// Returns the updated donor, or `None` when logged out.
    pub async fn apply_stats(&self, stats: &DonorStats) -> Option<Donor> {
        let updated = {
            let mut guard = self.current.write().await;
            let session = guard.as_mut()?;
            session.apply_stats(stats);
            session.clone()
        };
        self.persist(&updated).await;
        Some(updated.donor)
    }

    /// Replace the cached donor with a fresh server copy, keeping the token.
    pub async fn replace_donor(&self, donor: Donor) -> bool {
        let updated = {
            let mut guard = self.current.write().await;
            let Some(session) = guard.as_mut() else {
                return false;
            };
            session.replace_donor(donor);
            session.clone()
        };
        self.persist(&updated).await;
        true
    }

    /// Forget the session in memory and on disk.
    pub async fn clear(&self) {
        *self.current.write().await = None;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to remove stored session");
        }
        info!("Session cleared");
    }

    async fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(session).await {
            warn!(error = %e, "Failed to persist session");
        }
    }
}
