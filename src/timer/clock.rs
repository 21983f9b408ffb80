//! Countdown state machine.
//!
//! `SessionClock` holds the remaining time, the phase, the round and the set,
//! and decides what comes next when a countdown reaches zero. It performs no
//! I/O and knows nothing about wall-clock time: each call to `advance()` is one
//! second.
//!
//! ```text
//! Work ──(round < rounds)──────────────▶ ShortBreak ──▶ Work (round + 1)
//!  │
//!  ├──(round == rounds, set < sets)────▶ LongBreak ──▶ Work (round 1, set + 1)
//!  │
//!  └──(round == rounds, set == sets)───▶ terminal
//! ```

use tracing::debug;

use crate::types::{ConfigError, Phase, SessionConfig};

// ============================================================================
// Outcomes
// ============================================================================

/// What `start()` found when it was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSignal {
    /// The clock was idle; a new session begins.
    SessionStart,
    /// A paused session continues.
    Resume,
    /// The clock was already running; nothing changed.
    AlreadyRunning,
}

/// Phase, round and set at one point of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMarker {
    pub phase: Phase,
    pub round: u32,
    pub set: u32,
}

/// Result of a countdown reaching zero.
///
/// `ended` describes the phase that just finished, with the round and set it
/// ran in. `next` is the phase the clock has moved into, or `None` when the
/// last work phase of the last set finished and the session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub ended: PhaseMarker,
    pub next: Option<PhaseMarker>,
}

impl TransitionOutcome {
    /// Returns true when the session has no further phase.
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

// ============================================================================
// SessionClock
// ============================================================================

/// Phase/round/set progression driven by one-second ticks.
#[derive(Debug, Clone)]
pub struct SessionClock {
    config: SessionConfig,
    pending_config: Option<SessionConfig>,
    time_left: u32,
    phase: Phase,
    round: u32,
    set: u32,
    running: bool,
    idle: bool,
}

impl SessionClock {
    /// Creates an idle clock positioned at the first work phase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if any duration or count is zero.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            pending_config: None,
            time_left: config.work_duration,
            phase: Phase::Work,
            round: 1,
            set: 1,
            running: false,
            idle: true,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Configuration waiting for the current session to end.
    pub fn pending_config(&self) -> Option<&SessionConfig> {
        self.pending_config.as_ref()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn set(&self) -> u32 {
        self.set
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true when no session is in progress.
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Current phase, round and set.
    pub fn marker(&self) -> PhaseMarker {
        PhaseMarker {
            phase: self.phase,
            round: self.round,
            set: self.set,
        }
    }

    /// Duration of the current phase in seconds.
    pub fn phase_duration(&self) -> u32 {
        self.config.duration_of(self.phase)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Starts or resumes the countdown.
    pub fn start(&mut self) -> StartSignal {
        if self.running {
            return StartSignal::AlreadyRunning;
        }
        self.running = true;
        if self.idle {
            self.idle = false;
            StartSignal::SessionStart
        } else {
            StartSignal::Resume
        }
    }

    /// Stops the countdown without touching the position.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Returns to the first work phase of the first set.
    ///
    /// The running flag and the session itself are kept.
    pub fn reset(&mut self) {
        self.time_left = self.config.work_duration;
        self.phase = Phase::Work;
        self.round = 1;
        self.set = 1;
    }

    /// Offers a new configuration.
    ///
    /// Applied at once when idle; otherwise staged until the running session
    /// ends. Returns true when the configuration was staged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` and keeps the prior configuration
    /// if any duration or count is zero.
    pub fn apply_config(&mut self, config: SessionConfig) -> Result<bool, ConfigError> {
        config.validate()?;
        if self.idle {
            self.config = config;
            self.pending_config = None;
            self.reset();
            Ok(false)
        } else {
            self.pending_config = Some(config);
            Ok(true)
        }
    }

    /// Counts down one second.
    ///
    /// Returns the transition when the countdown reaches zero.
    pub fn advance(&mut self) -> Option<TransitionOutcome> {
        if !self.running {
            return None;
        }
        if self.time_left > 0 {
            self.time_left -= 1;
        }
        if self.time_left > 0 {
            return None;
        }
        Some(self.transition())
    }

    fn transition(&mut self) -> TransitionOutcome {
        let ended = self.marker();
        let config = self.config;

        let next = match self.phase {
            Phase::Work if self.round < config.rounds => Some(PhaseMarker {
                phase: Phase::ShortBreak,
                round: self.round,
                set: self.set,
            }),
            Phase::Work if self.set < config.sets => Some(PhaseMarker {
                phase: Phase::LongBreak,
                round: 1,
                set: self.set + 1,
            }),
            Phase::Work => None,
            Phase::ShortBreak => Some(PhaseMarker {
                phase: Phase::Work,
                round: self.round + 1,
                set: self.set,
            }),
            Phase::LongBreak => Some(PhaseMarker {
                phase: Phase::Work,
                round: self.round,
                set: self.set,
            }),
        };

        match next {
            Some(marker) => {
                self.phase = marker.phase;
                self.round = marker.round;
                self.set = marker.set;
                self.time_left = config.duration_of(marker.phase);
                debug!(
                    "{} finished (round {}, set {}), entering {}",
                    ended.phase.as_str(),
                    ended.round,
                    ended.set,
                    marker.phase.as_str()
                );
            }
            None => self.finish(),
        }

        TransitionOutcome { ended, next }
    }

    /// Stops after the last phase and returns to an idle first round.
    fn finish(&mut self) {
        debug!("all sets complete");
        self.running = false;
        self.idle = true;
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
        self.reset();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(work: u32, rest: u32, rounds: u32, sets: u32) -> SessionClock {
        SessionClock::new(SessionConfig::new(work, rest, rounds, sets)).unwrap()
    }

    /// Advances until a transition fires, returning it with the tick count.
    fn run_phase(clock: &mut SessionClock) -> (TransitionOutcome, u32) {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if let Some(outcome) = clock.advance() {
                return (outcome, ticks);
            }
            assert!(ticks < 100_000, "phase never ended");
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_clock_is_idle_at_first_work_phase() {
            let clock = clock(30, 5, 2, 2);

            assert!(clock.is_idle());
            assert!(!clock.is_running());
            assert_eq!(clock.phase(), Phase::Work);
            assert_eq!(clock.round(), 1);
            assert_eq!(clock.set(), 1);
            assert_eq!(clock.time_left(), 30);
        }

        #[test]
        fn test_new_rejects_zero_work() {
            let err = SessionClock::new(SessionConfig::new(0, 5, 1, 1)).unwrap_err();
            assert_eq!(err.field(), "workDuration");
        }

        #[test]
        fn test_new_rejects_zero_rounds() {
            let err = SessionClock::new(SessionConfig::new(5, 5, 0, 1)).unwrap_err();
            assert_eq!(err.field(), "rounds");
        }
    }

    mod command_tests {
        use super::*;

        #[test]
        fn test_start_signals_session_start_then_resume() {
            let mut clock = clock(10, 5, 1, 1);

            assert_eq!(clock.start(), StartSignal::SessionStart);
            assert!(clock.is_running());
            assert!(!clock.is_idle());

            assert_eq!(clock.start(), StartSignal::AlreadyRunning);

            clock.pause();
            assert!(!clock.is_running());
            assert_eq!(clock.start(), StartSignal::Resume);
        }

        #[test]
        fn test_advance_is_noop_when_paused() {
            let mut clock = clock(10, 5, 1, 1);

            assert!(clock.advance().is_none());
            assert_eq!(clock.time_left(), 10);

            clock.start();
            clock.advance();
            clock.pause();
            assert!(clock.advance().is_none());
            assert_eq!(clock.time_left(), 9);
        }

        #[test]
        fn test_pause_preserves_position() {
            let mut clock = clock(10, 5, 2, 1);
            clock.start();
            for _ in 0..4 {
                clock.advance();
            }
            clock.pause();

            assert_eq!(clock.time_left(), 6);
            assert_eq!(clock.phase(), Phase::Work);
        }

        #[test]
        fn test_reset_returns_to_first_work_phase() {
            let mut clock = clock(4, 2, 2, 2);
            clock.start();
            // Into the long break of set 1.
            run_phase(&mut clock);
            run_phase(&mut clock);
            run_phase(&mut clock);
            assert_eq!(clock.phase(), Phase::LongBreak);
            assert_eq!(clock.set(), 2);
            clock.advance();

            clock.reset();

            assert_eq!(clock.time_left(), 4);
            assert_eq!(clock.phase(), Phase::Work);
            assert_eq!(clock.round(), 1);
            assert_eq!(clock.set(), 1);
            assert!(clock.is_running(), "reset keeps the running flag");
            assert!(!clock.is_idle(), "reset keeps the session");
        }

        #[test]
        fn test_reset_while_paused_stays_paused() {
            let mut clock = clock(4, 2, 1, 1);
            clock.start();
            clock.advance();
            clock.pause();

            clock.reset();

            assert!(!clock.is_running());
            assert_eq!(clock.time_left(), 4);
        }
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_work_to_short_break_keeps_round_and_set() {
            let mut clock = clock(3, 2, 2, 1);
            clock.start();

            let (outcome, ticks) = run_phase(&mut clock);

            assert_eq!(ticks, 3);
            assert_eq!(
                outcome.ended,
                PhaseMarker { phase: Phase::Work, round: 1, set: 1 }
            );
            assert_eq!(
                outcome.next,
                Some(PhaseMarker { phase: Phase::ShortBreak, round: 1, set: 1 })
            );
            assert_eq!(clock.time_left(), 2);
        }

        #[test]
        fn test_short_break_to_work_increments_round() {
            let mut clock = clock(3, 2, 2, 1);
            clock.start();
            run_phase(&mut clock);

            let (outcome, ticks) = run_phase(&mut clock);

            assert_eq!(ticks, 2);
            assert_eq!(outcome.ended.phase, Phase::ShortBreak);
            assert_eq!(outcome.ended.round, 1);
            assert_eq!(
                outcome.next,
                Some(PhaseMarker { phase: Phase::Work, round: 2, set: 1 })
            );
            assert_eq!(clock.time_left(), 3);
        }

        #[test]
        fn test_last_round_of_set_enters_long_break() {
            let mut clock = clock(3, 2, 1, 2);
            clock.start();

            let (outcome, _) = run_phase(&mut clock);

            assert_eq!(
                outcome.ended,
                PhaseMarker { phase: Phase::Work, round: 1, set: 1 }
            );
            assert_eq!(
                outcome.next,
                Some(PhaseMarker { phase: Phase::LongBreak, round: 1, set: 2 })
            );
            assert_eq!(clock.time_left(), 6);
        }

        #[test]
        fn test_long_break_to_work_keeps_round_and_set() {
            let mut clock = clock(3, 2, 1, 2);
            clock.start();
            run_phase(&mut clock);

            let (outcome, ticks) = run_phase(&mut clock);

            assert_eq!(ticks, 6);
            assert_eq!(outcome.ended.phase, Phase::LongBreak);
            assert_eq!(
                outcome.next,
                Some(PhaseMarker { phase: Phase::Work, round: 1, set: 2 })
            );
        }

        #[test]
        fn test_last_work_phase_is_terminal() {
            let mut clock = clock(2, 1, 1, 1);
            clock.start();

            let (outcome, _) = run_phase(&mut clock);

            assert!(outcome.is_terminal());
            assert_eq!(
                outcome.ended,
                PhaseMarker { phase: Phase::Work, round: 1, set: 1 }
            );
            assert!(!clock.is_running());
            assert!(clock.is_idle());
            assert_eq!(clock.time_left(), 2);
            assert!(clock.advance().is_none());
        }

        #[test]
        fn test_time_left_never_decrements_past_transition() {
            let mut clock = clock(2, 1, 2, 1);
            clock.start();

            assert!(clock.advance().is_none());
            assert_eq!(clock.time_left(), 1);
            assert!(clock.advance().is_some());
            assert_eq!(clock.time_left(), 1, "short break duration loaded");
        }

        #[test]
        fn test_scenario_five_two_two_one() {
            let mut clock = clock(5, 2, 2, 1);
            clock.start();

            let (outcome, ticks) = run_phase(&mut clock);
            assert_eq!(ticks, 5);
            assert_eq!(clock.phase(), Phase::ShortBreak);
            assert_eq!((clock.round(), clock.set(), clock.time_left()), (1, 1, 2));
            assert!(!outcome.is_terminal());

            let (_, ticks) = run_phase(&mut clock);
            assert_eq!(ticks, 2);
            assert_eq!(clock.phase(), Phase::Work);
            assert_eq!((clock.round(), clock.set(), clock.time_left()), (2, 1, 5));

            let (outcome, ticks) = run_phase(&mut clock);
            assert_eq!(ticks, 5);
            assert!(outcome.is_terminal());
            assert_eq!(outcome.ended.round, 2);
        }

        #[test]
        fn test_work_completions_until_terminal() {
            let mut clock = clock(1, 1, 3, 2);
            clock.start();

            let mut work_completions = 0;
            loop {
                let (outcome, _) = run_phase(&mut clock);
                if outcome.ended.phase == Phase::Work {
                    work_completions += 1;
                }
                if outcome.is_terminal() {
                    break;
                }
            }
            assert_eq!(work_completions, 6);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_apply_config_when_idle_takes_effect() {
            let mut clock = clock(10, 5, 1, 1);

            let staged = clock.apply_config(SessionConfig::new(20, 4, 2, 2)).unwrap();

            assert!(!staged);
            assert_eq!(clock.config().work_duration, 20);
            assert_eq!(clock.time_left(), 20);
        }

        #[test]
        fn test_apply_config_mid_session_is_staged() {
            let mut clock = clock(2, 1, 1, 1);
            clock.start();

            let staged = clock.apply_config(SessionConfig::new(7, 3, 1, 1)).unwrap();

            assert!(staged);
            assert_eq!(clock.config().work_duration, 2);
            assert_eq!(clock.pending_config().map(|c| c.work_duration), Some(7));

            let (outcome, _) = run_phase(&mut clock);
            assert!(outcome.is_terminal());
            assert_eq!(clock.config().work_duration, 7);
            assert!(clock.pending_config().is_none());
            assert_eq!(clock.time_left(), 7);
        }

        #[test]
        fn test_apply_invalid_config_keeps_prior() {
            let mut clock = clock(10, 5, 1, 1);

            let result = clock.apply_config(SessionConfig::new(0, 5, 1, 1));

            assert!(result.is_err());
            assert_eq!(clock.config().work_duration, 10);
            assert_eq!(clock.time_left(), 10);
        }
    }
}
