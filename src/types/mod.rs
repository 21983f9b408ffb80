//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Phase identification (work, short break, long break)
//! - Session configuration with validation
//! - Session history records and their event log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Phase
// ============================================================================

/// Represents the countdown mode the clock is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work
    Work,
    /// Break between rounds of a set
    ShortBreak,
    /// Break between sets
    LongBreak,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        }
    }

    /// Returns true for the work phase.
    pub fn is_work(&self) -> bool {
        matches!(self, Phase::Work)
    }

    /// Returns true for either break phase.
    pub fn is_break(&self) -> bool {
        !self.is_work()
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Work
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised when a configuration is offered for acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A duration or count was zero.
    #[error("invalid configuration: {field} must be a positive integer")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns the name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidConfig { field } => field,
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Multiplier applied to the rest duration to obtain the long break.
pub const LONG_BREAK_FACTOR: u32 = 3;

/// Durations and counts for one session.
///
/// Durations are whole seconds. The serialized field names match the
/// persisted history schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Work duration in seconds
    pub work_duration: u32,
    /// Short break duration in seconds
    pub rest_duration: u32,
    /// Rounds per set
    pub rounds: u32,
    /// Sets per session
    pub sets: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_duration: 25 * 60,
            rest_duration: 5 * 60,
            rounds: 4,
            sets: 1,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration from its four parts without validating it.
    pub fn new(work_duration: u32, rest_duration: u32, rounds: u32, sets: u32) -> Self {
        Self {
            work_duration,
            rest_duration,
            rounds,
            sets,
        }
    }

    /// Sets the work duration in seconds.
    pub fn with_work_duration(mut self, seconds: u32) -> Self {
        self.work_duration = seconds;
        self
    }

    /// Sets the short break duration in seconds.
    pub fn with_rest_duration(mut self, seconds: u32) -> Self {
        self.rest_duration = seconds;
        self
    }

    /// Sets the number of rounds per set.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Sets the number of sets per session.
    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = sets;
        self
    }

    /// Long break duration in seconds.
    pub fn long_break_duration(&self) -> u32 {
        self.rest_duration.saturating_mul(LONG_BREAK_FACTOR)
    }

    /// Duration of the given phase in seconds.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.rest_duration,
            Phase::LongBreak => self.long_break_duration(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("workDuration", self.work_duration),
            ("restDuration", self.rest_duration),
            ("rounds", self.rounds),
            ("sets", self.sets),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConfigError::InvalidConfig { field: *field }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Session history
// ============================================================================

/// Kind of entry in a session's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Countdown started or resumed
    Start,
    /// Countdown paused
    Pause,
    /// Clock reset to the first round of the first set
    Restart,
    /// A phase ran to zero
    Complete,
}

impl EventKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Pause => "pause",
            EventKind::Restart => "restart",
            EventKind::Complete => "complete",
        }
    }
}

/// One immutable entry in a session's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub time: DateTime<Utc>,
    pub round: u32,
    pub set: u32,
    pub is_work_time: bool,
}

impl SessionEvent {
    /// Creates an event stamped with the current time.
    pub fn now(kind: EventKind, round: u32, set: u32, is_work_time: bool) -> Self {
        Self {
            kind,
            time: Utc::now(),
            round,
            set,
            is_work_time,
        }
    }
}

/// A recorded session.
///
/// Mutable only while owned by the recorder; once sealed it moves into the
/// session list and is never changed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub config: SessionConfig,
    pub completed: bool,
    pub events: Vec<SessionEvent>,
}

impl Session {
    /// Opens a new session whose log starts with `first`.
    pub fn begin(config: SessionConfig, first: SessionEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: first.time,
            config,
            completed: false,
            events: vec![first],
        }
    }

    /// Number of events of the given kind.
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of work phases that ran to zero.
    pub fn completed_work_phases(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Complete && e.is_work_time)
            .count()
    }
}

/// Sealed sessions, newest first.
pub type SessionList = Vec<Session>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Phase Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(Phase::default(), Phase::Work);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Phase::Work.as_str(), "work");
            assert_eq!(Phase::ShortBreak.as_str(), "short_break");
            assert_eq!(Phase::LongBreak.as_str(), "long_break");
        }

        #[test]
        fn test_is_work_and_is_break() {
            assert!(Phase::Work.is_work());
            assert!(!Phase::Work.is_break());
            assert!(Phase::ShortBreak.is_break());
            assert!(Phase::LongBreak.is_break());
        }
    }

    // ------------------------------------------------------------------------
    // SessionConfig Tests
    // ------------------------------------------------------------------------

    mod session_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = SessionConfig::default();
            assert_eq!(config.work_duration, 1500);
            assert_eq!(config.rest_duration, 300);
            assert_eq!(config.rounds, 4);
            assert_eq!(config.sets, 1);
        }

        #[test]
        fn test_builder_pattern() {
            let config = SessionConfig::default()
                .with_work_duration(50)
                .with_rest_duration(10)
                .with_rounds(3)
                .with_sets(2);

            assert_eq!(config, SessionConfig::new(50, 10, 3, 2));
        }

        #[test]
        fn test_long_break_is_three_rests() {
            let config = SessionConfig::new(60, 7, 1, 1);
            assert_eq!(config.long_break_duration(), 21);
            assert_eq!(config.duration_of(Phase::LongBreak), 21);
            assert_eq!(config.duration_of(Phase::ShortBreak), 7);
            assert_eq!(config.duration_of(Phase::Work), 60);
        }

        #[test]
        fn test_long_break_saturates() {
            let config = SessionConfig::new(1, u32::MAX, 1, 1);
            assert_eq!(config.long_break_duration(), u32::MAX);
        }

        #[test]
        fn test_validate_success() {
            assert!(SessionConfig::new(1, 1, 1, 1).validate().is_ok());
            assert!(SessionConfig::default().validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_each_zero_field() {
            let cases = [
                (SessionConfig::new(0, 1, 1, 1), "workDuration"),
                (SessionConfig::new(1, 0, 1, 1), "restDuration"),
                (SessionConfig::new(1, 1, 0, 1), "rounds"),
                (SessionConfig::new(1, 1, 1, 0), "sets"),
            ];
            for (config, field) in cases {
                let err = config.validate().unwrap_err();
                assert_eq!(err, ConfigError::InvalidConfig { field });
                assert_eq!(err.field(), field);
                assert!(err.to_string().contains(field));
            }
        }

        #[test]
        fn test_serialized_field_names() {
            let json = serde_json::to_string(&SessionConfig::new(5, 2, 2, 1)).unwrap();
            assert_eq!(
                json,
                r#"{"workDuration":5,"restDuration":2,"rounds":2,"sets":1}"#
            );
        }
    }

    // ------------------------------------------------------------------------
    // Session Tests
    // ------------------------------------------------------------------------

    mod session_tests {
        use super::*;

        #[test]
        fn test_event_kind_serialize() {
            assert_eq!(
                serde_json::to_string(&EventKind::Restart).unwrap(),
                "\"restart\""
            );
            assert_eq!(EventKind::Complete.as_str(), "complete");
        }

        #[test]
        fn test_begin_uses_first_event_time() {
            let first = SessionEvent::now(EventKind::Start, 1, 1, true);
            let session = Session::begin(SessionConfig::default(), first.clone());

            assert_eq!(session.date, first.time);
            assert!(!session.completed);
            assert_eq!(session.events, vec![first]);
            assert!(!session.id.is_empty());
        }

        #[test]
        fn test_begin_assigns_distinct_ids() {
            let a = Session::begin(
                SessionConfig::default(),
                SessionEvent::now(EventKind::Start, 1, 1, true),
            );
            let b = Session::begin(
                SessionConfig::default(),
                SessionEvent::now(EventKind::Start, 1, 1, true),
            );
            assert_ne!(a.id, b.id);
        }

        #[test]
        fn test_session_json_schema() {
            let session = Session::begin(
                SessionConfig::new(5, 2, 2, 1),
                SessionEvent::now(EventKind::Start, 1, 1, true),
            );
            let value = serde_json::to_value(&session).unwrap();

            assert_eq!(value["workDuration"], 5);
            assert_eq!(value["restDuration"], 2);
            assert_eq!(value["rounds"], 2);
            assert_eq!(value["sets"], 1);
            assert_eq!(value["completed"], false);
            assert_eq!(value["events"][0]["type"], "start");
            assert_eq!(value["events"][0]["isWorkTime"], true);
            assert!(value["date"].is_string());
        }

        #[test]
        fn test_deserialize_browser_record() {
            let json = r#"{
                "id": "1718000000000",
                "date": "2024-06-10T06:13:20.000Z",
                "workDuration": 1500,
                "restDuration": 300,
                "rounds": 4,
                "sets": 1,
                "completed": true,
                "events": [
                    {"type": "start", "time": "2024-06-10T06:13:20.000Z",
                     "round": 1, "set": 1, "isWorkTime": true},
                    {"type": "complete", "time": "2024-06-10T06:38:20.000Z",
                     "round": 1, "set": 1, "isWorkTime": true}
                ]
            }"#;
            let session: Session = serde_json::from_str(json).unwrap();

            assert_eq!(session.id, "1718000000000");
            assert_eq!(session.config, SessionConfig::default());
            assert_eq!(session.count_of(EventKind::Start), 1);
            assert_eq!(session.completed_work_phases(), 1);
        }
    }
}
