//! Notification error types.

use thiserror::Error;

/// Errors that can occur while emitting a phase alert.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The alert could not be written to its output.
    #[error("failed to emit alert: {0}")]
    Output(#[from] std::io::Error),

    /// Generic alert failure.
    #[error("alert failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotifyError::Failed("no terminal".to_string());
        assert!(err.to_string().contains("no terminal"));

        let err = NotifyError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        assert!(err.to_string().contains("pipe closed"));
    }
}
