//! Error types for feed generation.

use thiserror::Error;

/// Errors that can occur while generating the podcast feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Output directory could not be scanned.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
