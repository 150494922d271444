//! Error types for the assembler module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling chunk files into one artifact.
#[derive(Debug, Error)]
pub enum AssemblerError {
    /// FFmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Working directory contained no chunk files.
    #[error("no chunk files found in {dir}")]
    NoChunks { dir: PathBuf },

    /// Concatenation process exited unsuccessfully.
    #[error("concatenation failed: {reason}")]
    ConcatFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Concatenation timed out.
    #[error("concatenation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during assembly.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssemblerError {
    /// Creates a new concat failed error with captured stderr.
    pub fn concat_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConcatFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
