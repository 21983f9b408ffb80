//! Storage error types.
//!
//! Read failures and malformed values degrade to defaults at the call site;
//! write failures are surfaced to the caller but never roll back in-memory
//! state.

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors that can occur while reading or writing persisted values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored value could not be read.
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The value could not be written.
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The store refused the write (e.g. quota exceeded).
    #[error("store rejected write of '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    /// The value could not be serialized.
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value does not match the expected schema.
    #[error("stored value for '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored bytes are not valid UTF-8.
    #[error("stored value for '{key}' is not valid UTF-8: {source}")]
    NotUtf8 {
        key: String,
        #[source]
        source: FromUtf8Error,
    },

    /// No directory could be resolved for the store.
    #[error("no data directory available")]
    NoDataDirectory,
}

impl StorageError {
    /// Returns true if this error came from a failed write.
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Self::Write { .. } | Self::WriteRejected { .. } | Self::Serialize { .. }
        )
    }

    /// Returns true if the stored data could not be decoded or parsed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::NotUtf8 { .. })
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
