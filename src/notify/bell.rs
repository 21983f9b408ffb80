//! Terminal bell notifier.

use std::io::{self, Write};

use tracing::debug;

use super::error::NotifyError;
use super::Notifier;
use crate::timer::TransitionOutcome;

/// ASCII BEL.
const BELL: &[u8] = b"\x07";

/// Rings the terminal bell on stderr.
#[derive(Debug, Default)]
pub struct TerminalBell {
    disabled: bool,
}

impl TerminalBell {
    /// Creates a bell; `disabled` silences it.
    #[must_use]
    pub fn new(disabled: bool) -> Self {
        Self { disabled }
    }
}

impl Notifier for TerminalBell {
    fn notify(&self, outcome: &TransitionOutcome) -> Result<(), NotifyError> {
        if self.is_disabled() {
            debug!("alerts disabled, skipping");
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        stderr.write_all(BELL)?;
        stderr.flush()?;
        debug!("bell rung for end of {}", outcome.ended.phase.as_str());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}
