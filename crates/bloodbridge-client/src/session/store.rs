//! Session persistence backends.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use bloodbridge_core::AppError;
use bloodbridge_core::result::AppResult;
use bloodbridge_entity::Session;

/// Where the session survives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load the stored session, if any.
    async fn load(&self) -> AppResult<Option<Session>>;

    /// Persist `session`, replacing any previous one.
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Forget the stored session.
    async fn clear(&self) -> AppResult<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::with_source(
                    bloodbridge_core::ErrorKind::Storage,
                    format!("Failed to read session file {}", self.path.display()),
                    e,
                ));
            }
        };
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
