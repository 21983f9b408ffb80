//! Timer module for the Pomodoro Timer.
//!
//! This module contains the session core:
//! - `clock`: countdown state machine with phase/round/set transitions
//! - `recorder`: per-session event log and history commits
//! - `engine`: one-second scheduler tying clock, recorder and alerts together

pub mod clock;
pub mod engine;
pub mod recorder;

pub use clock::{PhaseMarker, SessionClock, StartSignal, TransitionOutcome};
pub use engine::{Command, TimerEngine, TimerEvent};
pub use recorder::SessionRecorder;
