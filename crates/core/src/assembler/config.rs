//! Assembler configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ffmpeg-based assembler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssemblerConfig {
    /// Path to the ffmpeg binary (default: resolved from PATH).
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Extension of the chunk files to collect (default: "aac").
    /// Also the extension of the final media artifact.
    #[serde(default = "default_chunk_extension")]
    pub chunk_extension: String,
    /// Timeout for one concatenation run in seconds (default: 600).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            chunk_extension: default_chunk_extension(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_chunk_extension() -> String {
    "aac".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}
