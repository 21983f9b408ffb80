//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Session clock with work, short break and long break phases over rounds and sets
//! - Session recorder keeping a timestamped event log per session
//! - Timer engine driving the clock once per second
//! - Key-value storage for session history and saved settings
//! - Phase alerts through the terminal bell
//! - CLI command parsing and display utilities

pub mod cli;
pub mod history;
pub mod notify;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use history::SessionHistory;
pub use settings::SettingsStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use timer::{Command, SessionClock, SessionRecorder, TimerEngine, TimerEvent};
pub use types::{ConfigError, EventKind, Phase, Session, SessionConfig, SessionEvent, SessionList};
