//! Top-level wiring of the scheduling pipeline.
//!
//! `Scheduler::run` connects planner → dispatcher → fetch orchestrator
//! over their channels and runs until shutdown. `Scheduler::fetch_now`
//! is the degenerate path: one synthetic schedule, submitted directly to
//! the orchestrator, awaited synchronously.

mod locator;

pub use locator::parse_timeshift_locator;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use crate::assembler::Assembler;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::fetcher::{BulkDownloader, FetchError, FetchOrchestrator, FetchRequest};
use crate::planner::Planner;
use crate::provider::Provider;
use crate::rules::watch_rules;

/// The assembled recording pipeline.
pub struct Scheduler<P, A>
where
    P: Provider + 'static,
    A: Assembler + 'static,
{
    config: Config,
    provider: Arc<P>,
    assembler: Arc<A>,
}

impl<P, A> Scheduler<P, A>
where
    P: Provider + 'static,
    A: Assembler + 'static,
{
    pub fn new(config: Config, provider: Arc<P>, assembler: Arc<A>) -> Self {
        Self {
            config,
            provider,
            assembler,
        }
    }

    fn orchestrator(&self) -> Arc<FetchOrchestrator<P, A>> {
        Arc::new(FetchOrchestrator::new(
            self.config.fetcher(),
            Arc::clone(&self.provider),
            Arc::clone(&self.assembler),
            BulkDownloader::new(self.config.downloader.clone()),
        ))
    }

    /// Runs the scheduling pipeline until `shutdown` fires.
    ///
    /// There is no persisted resume state: stopping abandons pending
    /// schedules, and the next start recomputes them from the rules.
    pub async fn run(&self, shutdown: broadcast::Sender<()>) {
        info!("scheduler starting");

        let (schedules_tx, schedules_rx) = mpsc::channel(1);
        let (dispatch_tx, dispatch_rx) = mpsc::channel(1);
        let (reload_tx, reload_rx) = mpsc::channel(1);

        // Watcher handle must stay alive for change signals to flow.
        let _watcher = match watch_rules(&self.config.rules_path, reload_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(
                    path = %self.config.rules_path.display(),
                    error = %e,
                    "rules file watcher unavailable, hot reload disabled"
                );
                None
            }
        };

        let planner = Planner::new(
            self.config.rules_path.clone(),
            self.config.timezone(),
            self.config.default_fetch_offset(),
            self.config.scheduler.horizon_per_rule,
            self.config.planner_interval(),
        );

        let planner_handle = planner.spawn(schedules_tx, reload_rx, shutdown.subscribe());
        let dispatcher_handle =
            Dispatcher::new().spawn(schedules_rx, dispatch_tx, shutdown.subscribe());
        let fetcher_handle = self.orchestrator().spawn(dispatch_rx, shutdown.subscribe());

        for handle in [planner_handle, dispatcher_handle, fetcher_handle] {
            if let Err(e) = handle.await {
                error!(error = %e, "pipeline task failed");
            }
        }
        info!("scheduler stopped");
    }

    /// Fetches one already-known broadcast immediately, bypassing planner
    /// and dispatcher, and reports the job outcome synchronously.
    pub async fn fetch_now(&self, locator: &str) -> Result<(), FetchError> {
        let schedule = parse_timeshift_locator(locator, self.config.timezone())?;
        info!(%schedule, "ad-hoc fetch");

        let (shutdown_tx, _) = broadcast::channel(1);
        let (dispatch_tx, dispatch_rx) = mpsc::channel(1);
        let handle = self.orchestrator().spawn(dispatch_rx, shutdown_tx.subscribe());

        let (request, done) = FetchRequest::with_completion(schedule);
        dispatch_tx
            .send(request)
            .await
            .expect("orchestrator intake just spawned");
        // Closing the intake channel ends the loop once the job is spawned.
        drop(dispatch_tx);

        let outcome = match done.await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Io(std::io::Error::other(
                "job outcome channel closed",
            ))),
        };
        let _ = handle.await;
        outcome
    }
}
