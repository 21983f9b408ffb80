//! Session event log.
//!
//! `SessionRecorder` turns user actions and clock transitions into the
//! append-only event log of the active session, and moves the session into
//! the persisted list once the clock reports the terminal transition.

use tracing::{debug, info};

use crate::history::SessionHistory;
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{EventKind, Session, SessionEvent, SessionList};

use super::clock::{SessionClock, TransitionOutcome};

/// Owner of the active session and the session list.
#[derive(Debug)]
pub struct SessionRecorder<S> {
    history: SessionHistory<S>,
    sessions: SessionList,
    active: Option<Session>,
}

impl<S: KeyValueStore> SessionRecorder<S> {
    /// Creates a recorder, loading the stored session list.
    pub fn new(history: SessionHistory<S>) -> Self {
        let sessions = history.load();
        Self {
            history,
            sessions,
            active: None,
        }
    }

    /// The session being recorded, if any.
    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Sealed sessions, newest first.
    pub fn sessions(&self) -> &SessionList {
        &self.sessions
    }

    pub fn history(&self) -> &SessionHistory<S> {
        &self.history
    }

    /// Records a start/pause toggle.
    ///
    /// Must be called before the clock is mutated: the running flag decides
    /// between Pause and Start. Without an active session a new one is opened
    /// with a single Start event.
    pub fn record_toggle(&mut self, clock: &SessionClock) -> EventKind {
        let kind = if clock.is_running() {
            EventKind::Pause
        } else {
            EventKind::Start
        };
        let event = SessionEvent::now(kind, clock.round(), clock.set(), clock.phase().is_work());

        match self.active.as_mut() {
            Some(session) => session.events.push(event),
            None => {
                let session = Session::begin(*clock.config(), event);
                info!("session {} started", session.id);
                self.active = Some(session);
            }
        }
        kind
    }

    /// Records a reset to the first round of the first set.
    ///
    /// Returns false when there is no active session to record into.
    pub fn record_reset(&mut self) -> bool {
        let Some(session) = self.active.as_mut() else {
            debug!("reset without an active session, nothing recorded");
            return false;
        };
        session
            .events
            .push(SessionEvent::now(EventKind::Restart, 1, 1, true));
        true
    }

    /// Records a phase reaching zero.
    ///
    /// The Complete event carries the round, set and phase that just ended.
    /// On the terminal transition the session is sealed, prepended to the
    /// list and the list is persisted; the sealed session's id is returned.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the list cannot be saved. The sealed
    /// session stays in the in-memory list; [`persist`](Self::persist) retries.
    pub fn record_transition(
        &mut self,
        outcome: &TransitionOutcome,
    ) -> Result<Option<String>, StorageError> {
        let Some(session) = self.active.as_mut() else {
            debug!("transition without an active session, nothing recorded");
            return Ok(None);
        };

        let ended = outcome.ended;
        session.events.push(SessionEvent::now(
            EventKind::Complete,
            ended.round,
            ended.set,
            ended.phase.is_work(),
        ));

        if !outcome.is_terminal() {
            return Ok(None);
        }

        let mut sealed = match self.active.take() {
            Some(session) => session,
            None => return Ok(None),
        };
        sealed.completed = true;
        let id = sealed.id.clone();
        info!(
            "session {} completed with {} events",
            id,
            sealed.events.len()
        );
        self.sessions.insert(0, sealed);

        self.persist()?;
        Ok(Some(id))
    }

    /// Writes the full session list to the store.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the write fails.
    pub fn persist(&self) -> Result<(), StorageError> {
        self.history.save(&self.sessions)
    }

    /// Drops the active session without recording it.
    pub fn discard_active(&mut self) -> Option<Session> {
        let discarded = self.active.take();
        if let Some(session) = &discarded {
            info!("discarding unfinished session {}", session.id);
        }
        discarded
    }
}

// ============================================================================
// Tests
// ============================================================================
