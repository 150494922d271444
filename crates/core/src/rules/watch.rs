//! Rules-file change notification.
//!
//! The planner does not watch the filesystem itself; it subscribes to a
//! channel fed by a `notify` watcher on the rules file. Events coalesce
//! through the channel's single slot, so an editor writing in several
//! syscalls triggers one reload.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

use super::error::RuleError;

/// Handle keeping the filesystem watcher alive. Dropping it stops change
/// notifications.
pub struct RulesWatcher {
    _watcher: RecommendedWatcher,
}

/// Starts watching the rules file, signalling `changes` on every content
/// change (create, write, rename-over).
pub fn watch_rules(path: &Path, changes: mpsc::Sender<()>) -> Result<RulesWatcher, RuleError> {
    let mut watcher =
        notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    // A full slot means a reload is already pending.
                    let _ = changes.try_send(());
                }
            }
            Err(e) => warn!(error = %e, "rules file watcher error"),
        })?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok(RulesWatcher { _watcher: watcher })
}
