//! Fetcher configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration of the bulk chunk downloader.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloaderConfig {
    /// Maximum simultaneous in-flight chunk downloads within one job
    /// (default: 64). The system's only explicit backpressure valve
    /// against the media origin.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Attempts per chunk before the whole batch fails (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_max_concurrent() -> usize {
    64
}

fn default_max_attempts() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Assembled settings for the fetch orchestrator; built from the global
/// configuration rather than read from its own file section.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Directory receiving the sidecar and media artifacts.
    pub out_dir: PathBuf,
    /// Scratch directory under which each job gets a private working
    /// directory.
    pub work_dir: PathBuf,
    /// Per-job deadline in seconds. Must be generous enough to cover the
    /// whole chunk count of a multi-hour broadcast.
    pub job_timeout_secs: u64,
    /// Extension of the final media artifact.
    pub media_extension: String,
}
