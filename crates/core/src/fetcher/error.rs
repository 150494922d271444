//! Error taxonomy for fetch jobs.

use thiserror::Error;

use crate::assembler::AssemblerError;
use crate::provider::ProviderError;

/// Failure of a single chunk download attempt.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// HTTP transport failure or non-success response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing the chunk to the working directory failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that terminate one fetch job. Contained to the job: nothing in
/// this enum ever crashes the process.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Program metadata or playlist resolution failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// One chunk exhausted its retry budget, invalidating the batch.
    #[error("chunk download failed after {attempts} attempts: {url}")]
    ChunkDownload {
        url: String,
        attempts: u32,
        #[source]
        source: ChunkError,
    },

    /// Concatenation failed; no artifact was produced.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblerError),

    /// The job ran past its deadline and was cancelled.
    #[error("job exceeded deadline of {timeout_secs} seconds")]
    DeadlineExceeded { timeout_secs: u64 },

    /// Metadata sidecar could not be serialized.
    #[error("sidecar serialization failed: {0}")]
    Sidecar(#[from] serde_json::Error),

    /// Filesystem error outside chunk writes (working dir, sidecar).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ad-hoc time-shift locator could not be parsed.
    #[error("invalid time-shift locator: {input:?}")]
    InvalidLocator { input: String },
}

impl FetchError {
    /// Pipeline stage the error belongs to, for log correlation.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Provider(_) => "resolve",
            Self::ChunkDownload { .. } => "download",
            Self::Assembly(_) => "assemble",
            Self::DeadlineExceeded { .. } => "deadline",
            Self::Sidecar(_) => "sidecar",
            Self::Io(_) => "io",
            Self::InvalidLocator { .. } => "locator",
        }
    }
}
