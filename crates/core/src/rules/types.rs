//! Rule and schedule value types.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

/// Identifier of a broadcast station, e.g. "LFR" or "TBS".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A recurring recording instruction.
///
/// Weekday and start time are interpreted in the fixed station-local
/// timezone. `fetch_offset` is how long after broadcast start the
/// time-shifted archive becomes available upstream; retrieval must not
/// begin before `start + fetch_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub station_id: StationId,
    pub weekday: Weekday,
    pub start_hour: u32,
    pub start_minute: u32,
    pub duration: Duration,
    pub fetch_offset: Duration,
}

/// One concrete future occurrence of a [`Rule`].
///
/// Value object: created by the rule engine, consumed read-only by the
/// dispatcher and the fetch orchestrator, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub rule_name: String,
    pub station_id: StationId,
    pub start_time: DateTime<FixedOffset>,
    pub duration: Duration,
    /// Earliest instant at which retrieval may begin.
    pub fetch_time: DateTime<FixedOffset>,
}

impl Schedule {
    /// Key used for the canonical list ordering: ascending fetch time,
    /// ties broken by station and start time so queues stay deterministic.
    pub fn queue_key(&self) -> (DateTime<FixedOffset>, &StationId, DateTime<FixedOffset>) {
        (self.fetch_time, &self.station_id, self.start_time)
    }

    /// Compact timestamp of the broadcast start, used in artifact names
    /// and chunk filename prefixes.
    pub fn start_stamp(&self) -> String {
        self.start_time.format("%Y%m%d%H%M%S").to_string()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} (fetch {})",
            self.station_id,
            self.rule_name,
            self.start_time.format("%Y/%m/%d %H:%M"),
            self.fetch_time.format("%Y/%m/%d %H:%M"),
        )
    }
}
