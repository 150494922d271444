//! Recording rules: data model, occurrence engine, file loading, change
//! notification.

mod engine;
mod error;
mod loader;
mod types;
mod watch;

pub use engine::{next_occurrence, next_schedules, upcoming_schedules};
pub use error::RuleError;
pub use loader::load_rules;
pub use types::{Rule, Schedule, StationId};
pub use watch::{watch_rules, RulesWatcher};
