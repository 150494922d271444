//! TOML rules-file loading.

use std::path::Path;

use chrono::{Duration, Weekday};
use serde::Deserialize;

use super::error::RuleError;
use super::types::{Rule, StationId};

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    name: String,
    station_id: String,
    weekday: String,
    start: String,
    duration_mins: i64,
    /// Per-rule override of the configured default fetch offset.
    #[serde(default)]
    fetch_offset_mins: Option<i64>,
}

/// Loads recording rules from a TOML file.
///
/// The whole file is parsed before any rule is returned, so a single bad
/// entry rejects the file (no partial application; the caller keeps its
/// previous rule set).
pub fn load_rules(path: &Path, default_fetch_offset: Duration) -> Result<Vec<Rule>, RuleError> {
    let contents = std::fs::read_to_string(path)?;
    let file: RulesFile = toml::from_str(&contents)?;

    let mut rules = Vec::with_capacity(file.rules.len());
    for raw in file.rules {
        let weekday: Weekday = raw
            .weekday
            .parse()
            .map_err(|_| RuleError::InvalidWeekday(raw.weekday.clone()))?;
        let (start_hour, start_minute) = parse_start(&raw.start)?;
        rules.push(Rule {
            name: raw.name,
            station_id: StationId::new(raw.station_id),
            weekday,
            start_hour,
            start_minute,
            duration: Duration::minutes(raw.duration_mins),
            fetch_offset: raw
                .fetch_offset_mins
                .map(Duration::minutes)
                .unwrap_or(default_fetch_offset),
        });
    }
    Ok(rules)
}

fn parse_start(start: &str) -> Result<(u32, u32), RuleError> {
    let invalid = || RuleError::InvalidStart(start.to_string());
    let (hour, minute) = start.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}
