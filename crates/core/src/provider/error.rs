//! Error types for provider resolution.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Errors that can occur while resolving program metadata or chunk
/// playlists from the upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No program exists for the requested station/start time.
    #[error("no program found for station {station} at {start}")]
    NotFound {
        station: String,
        start: DateTime<FixedOffset>,
    },

    /// HTTP transport or decoding failure.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}")]
    BadStatus { status: u16 },

    /// Playlist resolved but contained no chunks.
    #[error("chunk playlist is empty")]
    EmptyPlaylist,

    /// Playlist content could not be interpreted.
    #[error("playlist parse error: {0}")]
    Parse(String),
}
