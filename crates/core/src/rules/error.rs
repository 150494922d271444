//! Error types for rule loading and watching.

use thiserror::Error;

/// Errors that can occur while loading or watching recording rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Rules file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rules file is not valid TOML.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Weekday string is not a recognized day name.
    #[error("invalid weekday: {0:?}")]
    InvalidWeekday(String),

    /// Start time is not a valid "HH:MM" string.
    #[error("invalid start time: {0:?}")]
    InvalidStart(String),

    /// Filesystem watcher error.
    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),
}
