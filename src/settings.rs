//! Saved timer configuration.
//!
//! The configuration used by `run` when no overrides are given lives under
//! [`SETTINGS_KEY`] in the same store as the history.

use thiserror::Error;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};
use crate::types::{ConfigError, SessionConfig};

/// Key holding the saved configuration.
pub const SETTINGS_KEY: &str = "pomodoroSettings";

/// Errors from saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Typed access to the saved configuration.
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the saved configuration.
    ///
    /// Falls back to `SessionConfig::default()` when nothing usable is stored.
    pub fn load(&self) -> SessionConfig {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SessionConfig::default(),
            Err(e) => {
                warn!("settings unavailable, using defaults: {}", e);
                return SessionConfig::default();
            }
        };

        match serde_json::from_str::<SessionConfig>(&raw) {
            Ok(config) if config.validate().is_ok() => config,
            Ok(config) => {
                warn!("ignoring invalid saved settings: {:?}", config);
                SessionConfig::default()
            }
            Err(e) => {
                warn!("ignoring malformed saved settings: {}", e);
                SessionConfig::default()
            }
        }
    }

    /// Validates and saves `config`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` without writing when a field is zero,
    /// or `SettingsError::Storage` when the write fails.
    pub fn save(&self, config: &SessionConfig) -> Result<(), SettingsError> {
        config.validate()?;
        let json = serde_json::to_string(config).map_err(|source| StorageError::Serialize {
            key: SETTINGS_KEY.to_string(),
            source,
        })?;
        self.store.set(SETTINGS_KEY, &json)?;
        Ok(())
    }
}
