//! Error types for the toaster_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for toaster_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session is already in progress; the start request was dropped
    #[error("Toast process is already in progress!")]
    AlreadyRunning,

    /// Reset was requested while a session is in progress
    #[error("Cannot reset while toasting is in progress.")]
    CannotResetWhileRunning,

    /// A control input is not a usable number, or lies outside [0, 10] in strict mode
    #[error("Invalid input: {name} = {value} (expected a number between 0 and 10)")]
    InvalidInputRange { name: &'static str, value: f64 },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is a user-facing warning rather than a failure.
    ///
    /// Warnings leave the toaster untouched; the caller can retry once the
    /// current session has finished.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::AlreadyRunning | Error::CannotResetWhileRunning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_classification() {
        assert!(Error::AlreadyRunning.is_warning());
        assert!(Error::CannotResetWhileRunning.is_warning());
        assert!(!Error::Config("bad".into()).is_warning());
        assert!(!Error::InvalidInputRange {
            name: "browning",
            value: 11.0
        }
        .is_warning());
    }

    #[test]
    fn test_messages_match_user_warnings() {
        assert_eq!(
            Error::AlreadyRunning.to_string(),
            "Toast process is already in progress!"
        );
        assert_eq!(
            Error::CannotResetWhileRunning.to_string(),
            "Cannot reset while toasting is in progress."
        );
    }
}
