//! Persisted session history.
//!
//! The history is a single JSON array stored under [`SESSIONS_KEY`], newest
//! session first. It is read once at startup and replaced wholesale every time
//! a session is sealed.

use tracing::{debug, warn};

use crate::storage::{KeyValueStore, Result, StorageError};
use crate::types::SessionList;

/// Key holding the session list.
pub const SESSIONS_KEY: &str = "pomodoroSessions";

/// Typed access to the session list in a key-value store.
#[derive(Debug)]
pub struct SessionHistory<S> {
    store: S,
}

impl<S: KeyValueStore> SessionHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the session list.
    ///
    /// Never fails: a missing or unreadable value yields an empty list, and a
    /// malformed value is purged from the store before returning an empty
    /// list.
    pub fn load(&self) -> SessionList {
        match self.try_load() {
            Ok(sessions) => sessions,
            Err(e) if e.is_malformed() => {
                warn!("discarding stored history: {}", e);
                if let Err(e) = self.store.remove(SESSIONS_KEY) {
                    warn!("failed to purge malformed history: {}", e);
                }
                SessionList::new()
            }
            Err(e) => {
                warn!("history unavailable, starting empty: {}", e);
                SessionList::new()
            }
        }
    }

    /// Loads the session list, reporting what went wrong.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Read` or `StorageError::Malformed`.
    pub fn try_load(&self) -> Result<SessionList> {
        let Some(raw) = self.store.get(SESSIONS_KEY)? else {
            return Ok(SessionList::new());
        };
        let sessions: SessionList =
            serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
                key: SESSIONS_KEY.to_string(),
                source,
            })?;
        debug!("loaded {} sessions", sessions.len());
        Ok(sessions)
    }

    /// Overwrites the stored list with `sessions`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if serialization or the write fails.
    pub fn save(&self, sessions: &SessionList) -> Result<()> {
        let json = serde_json::to_string(sessions).map_err(|source| StorageError::Serialize {
            key: SESSIONS_KEY.to_string(),
            source,
        })?;
        self.store.set(SESSIONS_KEY, &json)?;
        debug!("saved {} sessions", sessions.len());
        Ok(())
    }

    /// Removes all stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the value cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(SESSIONS_KEY)
    }
}
