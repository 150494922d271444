//! Fetch job types.

use std::path::PathBuf;

use tokio::sync::oneshot;

use super::error::FetchError;
use crate::rules::Schedule;

/// A schedule handed to the fetch orchestrator.
///
/// `done` is present only in ad-hoc mode, where the caller blocks on the
/// job outcome; scheduled dispatch is fire-and-forget.
pub struct FetchRequest {
    pub schedule: Schedule,
    pub done: Option<oneshot::Sender<Result<(), FetchError>>>,
}

impl FetchRequest {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            done: None,
        }
    }

    pub fn with_completion(
        schedule: Schedule,
    ) -> (Self, oneshot::Receiver<Result<(), FetchError>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                schedule,
                done: Some(tx),
            },
            rx,
        )
    }
}

/// Artifacts produced by one successful job.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub sidecar_path: PathBuf,
    pub media_path: PathBuf,
    pub chunk_count: usize,
}
