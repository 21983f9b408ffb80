//! Phase completion alerts.
//!
//! The timer engine calls a [`Notifier`] once for every phase that runs to
//! zero. Alerts are fire-and-forget: a failure is logged by the caller and
//! never affects the timer or the history.
//!
//! - [`TerminalBell`]: rings the terminal bell on stderr
//! - [`MockNotifier`]: records calls, for tests

mod bell;
mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use bell::TerminalBell;
pub use error::NotifyError;

use crate::timer::TransitionOutcome;

/// Trait for phase alert implementations.
pub trait Notifier {
    /// Emits an alert for a finished phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert could not be emitted.
    fn notify(&self, outcome: &TransitionOutcome) -> Result<(), NotifyError>;

    /// Returns true if alerts are silenced.
    fn is_disabled(&self) -> bool;
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, outcome: &TransitionOutcome) -> Result<(), NotifyError> {
        (**self).notify(outcome)
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<TransitionOutcome>>,
    should_fail: AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<TransitionOutcome> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TransitionOutcome>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, outcome: &TransitionOutcome) -> Result<(), NotifyError> {
        self.lock().push(*outcome);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Failed("mock failure".to_string()));
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        false
    }
}
