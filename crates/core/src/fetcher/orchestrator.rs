//! Fetch orchestrator: one independent, deadline-bounded job per
//! dispatched schedule.
//!
//! Jobs run fully concurrently with each other; only chunk downloads
//! within a job are concurrency-bounded (by the bulk downloader's
//! admission gate). A job failure terminates that job alone.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::config::FetcherConfig;
use super::download::BulkDownloader;
use super::error::FetchError;
use super::types::{FetchRequest, JobOutput};
use crate::assembler::Assembler;
use crate::provider::Provider;
use crate::rules::Schedule;

/// Spawns and supervises fetch jobs.
pub struct FetchOrchestrator<P, A>
where
    P: Provider + 'static,
    A: Assembler + 'static,
{
    config: FetcherConfig,
    provider: Arc<P>,
    assembler: Arc<A>,
    downloader: Arc<BulkDownloader>,
}

impl<P, A> FetchOrchestrator<P, A>
where
    P: Provider + 'static,
    A: Assembler + 'static,
{
    /// Creates a new orchestrator.
    pub fn new(
        config: FetcherConfig,
        provider: Arc<P>,
        assembler: Arc<A>,
        downloader: BulkDownloader,
    ) -> Self {
        Self {
            config,
            provider,
            assembler,
            downloader: Arc::new(downloader),
        }
    }

    /// Spawns the intake loop. Each received request starts one job task;
    /// the loop itself never blocks on job completion.
    pub fn spawn(
        self: Arc<Self>,
        mut requests: mpsc::Receiver<FetchRequest>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("fetch orchestrator started");
            loop {
                tokio::select! {
                    request = requests.recv() => {
                        let Some(request) = request else { break };
                        let orchestrator = Arc::clone(&self);
                        tokio::spawn(async move {
                            orchestrator.handle_request(request).await;
                        });
                    }
                    _ = shutdown.recv() => break,
                }
            }
            info!("fetch orchestrator stopped");
        })
    }

    /// Runs one job under its deadline and reports the outcome.
    async fn handle_request(&self, request: FetchRequest) {
        let schedule = request.schedule;
        let station = schedule.station_id.to_string();
        let start = schedule.start_stamp();
        info!(%schedule, "job started");

        let work_dir = self
            .config
            .work_dir
            .join(format!("{}_{}", schedule.station_id, start));

        let deadline = Duration::from_secs(self.config.job_timeout_secs);
        let outcome = match timeout(deadline, self.run_job(&schedule, &work_dir)).await {
            Ok(Ok(output)) => {
                info!(
                    station = %station,
                    start = %start,
                    media = %output.media_path.display(),
                    chunks = output.chunk_count,
                    "job finished"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                error!(station = %station, start = %start, stage = e.stage(), error = %e, "job failed");
                Err(e)
            }
            Err(_) => {
                let e = FetchError::DeadlineExceeded {
                    timeout_secs: self.config.job_timeout_secs,
                };
                error!(station = %station, start = %start, stage = e.stage(), error = %e, "job failed");
                Err(e)
            }
        };

        // The deadline cancels run_job mid-flight, so cleanup happens here
        // rather than inside the job.
        if work_dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
                warn!(dir = %work_dir.display(), error = %e, "failed to remove job working directory");
            }
        }

        if let Some(done) = request.done {
            let _ = done.send(outcome);
        }
    }

    /// The job body: resolve, persist metadata, download, assemble.
    async fn run_job(
        &self,
        schedule: &Schedule,
        work_dir: &Path,
    ) -> Result<JobOutput, FetchError> {
        let program = self
            .provider
            .resolve_program(&schedule.station_id, schedule.start_time)
            .await?;

        let stem = program.artifact_stem();
        let sidecar_path = self.config.out_dir.join(format!("{stem}.json"));
        let sidecar = serde_json::to_vec_pretty(&program)?;
        tokio::fs::write(&sidecar_path, sidecar).await?;

        let urls = self
            .provider
            .resolve_chunklist(&schedule.station_id, schedule.start_time)
            .await?;

        tokio::fs::create_dir_all(work_dir).await?;
        let prefix = format!("{}{}_", schedule.station_id, schedule.start_stamp());
        let chunks = self
            .downloader
            .download_all(&urls, work_dir, &prefix)
            .await?;

        let media_path = self
            .config
            .out_dir
            .join(format!("{stem}.{}", self.config.media_extension));
        self.assembler.assemble(work_dir, &media_path).await?;

        Ok(JobOutput {
            sidecar_path,
            media_path,
            chunk_count: chunks.len(),
        })
    }
}
