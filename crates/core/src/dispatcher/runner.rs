//! Dispatcher implementation.
//!
//! Owns the live queue of pending schedules, ordered ascending by fetch
//! time, and runs a single-timer countdown loop: sleep until the head is
//! due, dispatch every due entry, rearm for the new head. The queue is
//! replaced wholesale when the planner publishes a new list and is never
//! reordered otherwise.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::fetcher::FetchRequest;
use crate::rules::Schedule;

/// Timer value standing in for "infinite" while the queue is empty.
const IDLE_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Single-owner dispatch queue.
pub struct Dispatcher {
    queue: VecDeque<Schedule>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Spawns the dispatch loop.
    ///
    /// The loop blocks until the first schedule list arrives, then
    /// dispatches each schedule exactly once at (or just after) its fetch
    /// time. Reliability beyond that point is the fetch pipeline's job.
    pub fn spawn(
        self,
        schedules: mpsc::Receiver<Vec<Schedule>>,
        dispatch: mpsc::Sender<FetchRequest>,
        shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(schedules, dispatch, shutdown))
    }

    async fn run(
        mut self,
        mut schedules: mpsc::Receiver<Vec<Schedule>>,
        dispatch: mpsc::Sender<FetchRequest>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!("dispatcher started");

        tokio::select! {
            list = schedules.recv() => match list {
                Some(list) => self.replace_queue(list),
                None => {
                    info!("dispatcher stopped");
                    return;
                }
            },
            _ = shutdown.recv() => {
                info!("dispatcher stopped");
                return;
            }
        }

        loop {
            let wait = self.next_dispatch_delay();
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if !self.dispatch_due(&dispatch).await {
                        break;
                    }
                }
                list = schedules.recv() => match list {
                    Some(list) => self.replace_queue(list),
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }
        info!("dispatcher stopped");
    }

    fn replace_queue(&mut self, list: Vec<Schedule>) {
        debug!(count = list.len(), "adopting replacement schedule list");
        self.queue = VecDeque::from(list);
    }

    /// Time until the queue head is due; effectively infinite when empty.
    fn next_dispatch_delay(&self) -> Duration {
        match self.queue.front() {
            Some(head) => head
                .fetch_time
                .signed_duration_since(Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO),
            None => IDLE_WAIT,
        }
    }

    /// Pops and dispatches every due queue head. Returns false when the
    /// downstream channel is gone.
    async fn dispatch_due(&mut self, dispatch: &mpsc::Sender<FetchRequest>) -> bool {
        while let Some(head) = self.queue.front() {
            if head.fetch_time > Utc::now() {
                break;
            }
            let schedule = self.queue.pop_front().expect("head checked above");
            debug!(%schedule, "dispatching");
            if dispatch.send(FetchRequest::new(schedule)).await.is_err() {
                warn!("fetch orchestrator channel closed");
                return false;
            }
        }
        true
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
