//! Client-local storage for the bearer session.
//!
//! The session (token plus the user it belongs to) lives under a single key.
//! [`FileTokenStore`] keeps it in `<state_dir>/session.json` so it survives
//! restarts; [`MemoryTokenStore`] is for tests and embedders that manage
//! persistence themselves.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use innomart_core::User;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the persisted session inside the state directory.
pub const SESSION_KEY: &str = "session.json";

/// Errors reading or writing the cached session.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Filesystem error.
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record could not be decoded.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A cached bearer session.
#[derive(Debug, Clone)]
pub struct StoredSession {
    /// Bearer token attached to outbound requests.
    pub token: SecretString,
    /// User the token was issued to.
    pub user: User,
}

/// On-disk shape of [`StoredSession`].
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    user: User,
}

/// Storage for the bearer session.
///
/// Implementations must be cheap to call: the HTTP adapter loads the session
/// on every outbound request.
pub trait TokenStore: Send + Sync {
    /// Read the cached session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or decoded.
    fn load(&self) -> Result<Option<StoredSession>, TokenStoreError>;

    /// Replace the cached session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), TokenStoreError>;

    /// Remove the cached session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, TokenStoreError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), TokenStoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Session storage backed by a JSON file in the state directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the session under `state_dir/session.json`.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(SESSION_KEY),
        }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, TokenStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: SessionRecord = serde_json::from_str(&raw)?;
        Ok(Some(StoredSession {
            token: SecretString::from(record.token),
            user: record.user,
        }))
    }

    fn save(&self, session: &StoredSession) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = SessionRecord {
            token: session.token.expose_secret().to_string(),
            user: session.user.clone(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&record)?)?;
        tracing::debug!(path = %self.path.display(), "Session cached");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
