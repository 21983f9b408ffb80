//! Timer engine for the Pomodoro Timer.
//!
//! This module ties the pieces together on a single task:
//! - One `SessionClock::advance()` per second from `tokio::time::interval`
//! - User commands from an mpsc channel, handled ahead of pending ticks
//! - Event log recording and history persistence via `SessionRecorder`
//! - A phase alert through the `Notifier` on every transition
//! - `TimerEvent`s published for the display

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::history::SessionHistory;
use crate::notify::Notifier;
use crate::storage::KeyValueStore;
use crate::types::{ConfigError, SessionConfig};

use super::clock::{PhaseMarker, SessionClock, StartSignal, TransitionOutcome};
use super::recorder::SessionRecorder;

/// Seconds between ticks.
const TICK_INTERVAL_SECS: u64 = 1;

// ============================================================================
// Command
// ============================================================================

/// User requests delivered to a running engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start when paused or idle, pause when running
    Toggle,
    /// Back to the first work phase of the first set
    Reset,
    /// Offer a new configuration
    ApplyConfig(SessionConfig),
    /// Stop the engine
    Quit,
}

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A new session was opened
    SessionStarted {
        /// Id of the recorded session
        session_id: String,
    },
    /// A paused session continues
    Resumed,
    /// Countdown paused
    Paused,
    /// Clock reset to round 1 of set 1
    Restarted,
    /// One second elapsed
    Tick {
        /// Remaining seconds in the current phase
        remaining_seconds: u32,
    },
    /// A phase ran to zero
    PhaseCompleted {
        /// The phase that ended
        ended: PhaseMarker,
        /// The phase entered, `None` when the session is over
        next: Option<PhaseMarker>,
        /// Seconds loaded for the entered phase
        remaining_seconds: u32,
    },
    /// The last phase finished and the session was sealed
    SessionCompleted {
        /// Id of the sealed session
        session_id: String,
    },
    /// A configuration was accepted
    ConfigApplied {
        /// The accepted configuration
        config: SessionConfig,
        /// True when it waits for the current session to end
        staged: bool,
    },
    /// A configuration was refused
    ConfigRejected {
        /// Reason for refusal
        message: String,
    },
    /// The history could not be written
    PersistFailed {
        /// Storage error description
        message: String,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the clock, the recorder and the notifier.
pub struct TimerEngine<S, N> {
    clock: SessionClock,
    recorder: SessionRecorder<S>,
    notifier: N,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<S: KeyValueStore, N: Notifier> TimerEngine<S, N> {
    /// Creates an idle engine, loading the stored history.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if `config` has a zero field.
    pub fn new(
        config: SessionConfig,
        history: SessionHistory<S>,
        notifier: N,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            clock: SessionClock::new(config)?,
            recorder: SessionRecorder::new(history),
            notifier,
            event_tx,
        })
    }

    /// Returns the clock.
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Returns the recorder.
    pub fn recorder(&self) -> &SessionRecorder<S> {
        &self.recorder
    }

    /// Runs the engine until `Quit` arrives or the command channel closes.
    ///
    /// Commands are always served before a pending tick. An unfinished
    /// session is discarded on exit, including when the loop fails.
    pub async fn run(&mut self, commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        let result = self.serve(commands).await;
        self.shutdown();
        result
    }

    async fn serve(&mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        let period = Duration::from_secs(TICK_INTERVAL_SECS);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Quit) | None => return Ok(()),
                    Some(command) => {
                        let was_running = self.clock.is_running();
                        let rearm = command == Command::Reset;
                        self.handle_command(command)?;
                        // A resumed or reset countdown gets a full first second.
                        if rearm || (!was_running && self.clock.is_running()) {
                            ticker.reset();
                        }
                    }
                },
                _ = ticker.tick() => self.tick()?,
            }
        }
    }

    /// Applies one command.
    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        debug!("command: {:?}", command);
        match command {
            Command::Toggle => self.toggle(),
            Command::Reset => self.reset(),
            Command::ApplyConfig(config) => self.apply_config(config),
            Command::Quit => {
                self.shutdown();
                Ok(())
            }
        }
    }

    /// Starts or pauses depending on the running flag.
    pub fn toggle(&mut self) -> Result<()> {
        // The recorder reads the running flag before it changes.
        self.recorder.record_toggle(&self.clock);

        if self.clock.is_running() {
            self.clock.pause();
            return self.emit(TimerEvent::Paused);
        }

        match self.clock.start() {
            StartSignal::SessionStart => {
                let session_id = self
                    .recorder
                    .active_session()
                    .map(|s| s.id.clone())
                    .unwrap_or_default();
                self.emit(TimerEvent::SessionStarted { session_id })
            }
            StartSignal::Resume => self.emit(TimerEvent::Resumed),
            StartSignal::AlreadyRunning => Ok(()),
        }
    }

    /// Returns to round 1 of set 1 and records a Restart.
    pub fn reset(&mut self) -> Result<()> {
        self.clock.reset();
        self.recorder.record_reset();
        self.emit(TimerEvent::Restarted)
    }

    /// Offers a new configuration.
    ///
    /// A rejected configuration is reported as `ConfigRejected`; the prior
    /// configuration stays active.
    pub fn apply_config(&mut self, config: SessionConfig) -> Result<()> {
        match self.clock.apply_config(config) {
            Ok(staged) => {
                info!(
                    "configuration {}",
                    if staged { "staged" } else { "applied" }
                );
                self.emit(TimerEvent::ConfigApplied { config, staged })
            }
            Err(e) => {
                warn!("configuration rejected: {}", e);
                self.emit(TimerEvent::ConfigRejected {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> Result<()> {
        if !self.clock.is_running() {
            return Ok(());
        }

        match self.clock.advance() {
            Some(outcome) => self.handle_transition(outcome),
            None => self.emit(TimerEvent::Tick {
                remaining_seconds: self.clock.time_left(),
            }),
        }
    }

    /// Drops an unfinished session.
    pub fn shutdown(&mut self) {
        self.clock.pause();
        self.recorder.discard_active();
    }

    fn handle_transition(&mut self, outcome: TransitionOutcome) -> Result<()> {
        if let Err(e) = self.notifier.notify(&outcome) {
            warn!("phase alert failed: {}", e);
        }

        let recorded = self.recorder.record_transition(&outcome);

        self.emit(TimerEvent::PhaseCompleted {
            ended: outcome.ended,
            next: outcome.next,
            remaining_seconds: self.clock.time_left(),
        })?;

        let sealed = match recorded {
            Ok(sealed) => sealed,
            Err(e) => {
                warn!("failed to save history: {}", e);
                self.emit(TimerEvent::PersistFailed {
                    message: e.to_string(),
                })?;
                self.recorder.sessions().first().map(|s| s.id.clone())
            }
        };

        match sealed {
            Some(session_id) => self.emit(TimerEvent::SessionCompleted { session_id }),
            None => Ok(()),
        }
    }

    fn emit(&self, event: TimerEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send timer event")
    }
}

// ============================================================================
// Tests
// ============================================================================
