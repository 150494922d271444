//! Planner implementation.
//!
//! Owns the rule set and the last published schedule list. Recomputes
//! schedules on a fixed tick and on rules-file change signals, publishing
//! the full replacement list to the dispatcher only when it differs from
//! the previous one. A publish may block until the dispatcher is ready;
//! schedule changes are rare and low-volume, so that backpressure is
//! acceptable.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::rules::{load_rules, upcoming_schedules, Rule, Schedule};

/// Computes and publishes the upcoming schedule list.
pub struct Planner {
    rules_path: PathBuf,
    tz: FixedOffset,
    default_fetch_offset: chrono::Duration,
    horizon_per_rule: usize,
    interval: Duration,
    rules: Vec<Rule>,
    schedules: Vec<Schedule>,
}

impl Planner {
    pub fn new(
        rules_path: PathBuf,
        tz: FixedOffset,
        default_fetch_offset: chrono::Duration,
        horizon_per_rule: usize,
        interval: Duration,
    ) -> Self {
        Self {
            rules_path,
            tz,
            default_fetch_offset,
            horizon_per_rule,
            interval,
            rules: Vec::new(),
            schedules: Vec::new(),
        }
    }

    /// Spawns the planning loop.
    pub fn spawn(
        self,
        to_dispatcher: mpsc::Sender<Vec<Schedule>>,
        reload: mpsc::Receiver<()>,
        shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(to_dispatcher, reload, shutdown))
    }

    async fn run(
        mut self,
        to_dispatcher: mpsc::Sender<Vec<Schedule>>,
        mut reload: mpsc::Receiver<()>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!("planner started");

        self.reload_rules();
        self.publish_if_changed(&to_dispatcher).await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // the immediate first tick
        let mut reload_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.publish_if_changed(&to_dispatcher).await;
                }
                changed = reload.recv(), if reload_open => match changed {
                    Some(()) => {
                        debug!("rules file changed");
                        if self.reload_rules() {
                            self.publish_if_changed(&to_dispatcher).await;
                        }
                    }
                    None => reload_open = false,
                },
                _ = shutdown.recv() => break,
            }
        }
        info!("planner stopped");
    }

    /// Reloads the rule set from disk. On failure the previous rules are
    /// retained untouched and false is returned.
    fn reload_rules(&mut self) -> bool {
        match load_rules(&self.rules_path, self.default_fetch_offset) {
            Ok(rules) => {
                info!(rules = rules.len(), path = %self.rules_path.display(), "loaded rules");
                self.rules = rules;
                true
            }
            Err(e) => {
                error!(
                    path = %self.rules_path.display(),
                    error = %e,
                    "failed to load rules, keeping previous set"
                );
                false
            }
        }
    }

    /// Recomputes the schedule list and publishes it if it differs
    /// structurally from the last published one.
    async fn publish_if_changed(&mut self, to_dispatcher: &mpsc::Sender<Vec<Schedule>>) {
        let now: DateTime<FixedOffset> = Utc::now().with_timezone(&self.tz);
        let schedules = upcoming_schedules(&self.rules, self.horizon_per_rule, now);
        if schedules == self.schedules {
            return;
        }
        match schedules.first() {
            Some(next) => info!(count = schedules.len(), next = %next, "schedules updated"),
            None => info!("schedules updated: empty"),
        }
        self.schedules = schedules.clone();
        if to_dispatcher.send(schedules).await.is_err() {
            error!("dispatcher channel closed, schedule list dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ONE_RULE: &str = r#"
[[rules]]
name = "late night"
station_id = "LFR"
weekday = "Tue"
start = "01:00"
duration_mins = 120
"#;

    const TWO_RULES: &str = r#"
[[rules]]
name = "late night"
station_id = "LFR"
weekday = "Tue"
start = "01:00"
duration_mins = 120

[[rules]]
name = "morning show"
station_id = "TBS"
weekday = "Mon"
start = "08:30"
duration_mins = 90
"#;

    fn planner(path: PathBuf) -> Planner {
        Planner::new(
            path,
            FixedOffset::east_opt(9 * 3600).unwrap(),
            chrono::Duration::hours(6),
            3,
            Duration::from_secs(600),
        )
    }

    async fn recv_list(
        rx: &mut mpsc::Receiver<Vec<Schedule>>,
    ) -> Option<Vec<Schedule>> {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn publishes_initial_schedules_on_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, ONE_RULE).unwrap();

        let (list_tx, mut list_rx) = mpsc::channel(1);
        let (_reload_tx, reload_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = planner(path).spawn(list_tx, reload_rx, shutdown_tx.subscribe());

        let list = recv_list(&mut list_rx).await.expect("no initial publish");
        assert_eq!(list.len(), 3);
        for pair in list.windows(2) {
            assert!(pair[0].fetch_time <= pair[1].fetch_time);
        }

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn reload_signal_publishes_new_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, ONE_RULE).unwrap();

        let (list_tx, mut list_rx) = mpsc::channel(1);
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = planner(path.clone()).spawn(list_tx, reload_rx, shutdown_tx.subscribe());
        assert_eq!(recv_list(&mut list_rx).await.unwrap().len(), 3);

        fs::write(&path, TWO_RULES).unwrap();
        reload_tx.send(()).await.unwrap();

        let list = recv_list(&mut list_rx).await.expect("no publish after reload");
        assert_eq!(list.len(), 6);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn unchanged_rules_suppress_republish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, ONE_RULE).unwrap();

        let (list_tx, mut list_rx) = mpsc::channel(1);
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = planner(path).spawn(list_tx, reload_rx, shutdown_tx.subscribe());
        assert!(recv_list(&mut list_rx).await.is_some());

        // Same file content: reload succeeds, diff is empty, nothing sent.
        reload_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(list_rx.try_recv().is_err());

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn bad_rules_edit_keeps_last_good_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, ONE_RULE).unwrap();

        let (list_tx, mut list_rx) = mpsc::channel(1);
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = planner(path.clone()).spawn(list_tx, reload_rx, shutdown_tx.subscribe());
        assert!(recv_list(&mut list_rx).await.is_some());

        // Broken edit: reload fails, previous rules retained, no publish.
        fs::write(&path, "rules = [ broken").unwrap();
        reload_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(list_rx.try_recv().is_err());

        // A later valid edit still takes effect.
        fs::write(&path, TWO_RULES).unwrap();
        reload_tx.send(()).await.unwrap();
        let list = recv_list(&mut list_rx).await.expect("no publish after fix");
        assert_eq!(list.len(), 6);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn missing_rules_file_publishes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let (list_tx, mut list_rx) = mpsc::channel(1);
        let (_reload_tx, reload_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = planner(path).spawn(list_tx, reload_rx, shutdown_tx.subscribe());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(list_rx.try_recv().is_err());

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
