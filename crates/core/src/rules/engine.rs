//! Occurrence computation: mapping recurring rules to concrete schedules.
//!
//! All functions are pure in the reference instant so the engine can be
//! exercised at any point in time; callers pass "now" explicitly.

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone};

use super::types::{Rule, Schedule};

/// Computes the next occurrence of `rule` strictly after `after`.
///
/// The candidate is the instant in the same week as `after` matching the
/// rule's weekday/hour/minute in `after`'s timezone. A candidate that is
/// before *or equal to* `after` counts as already passed and is advanced
/// by exactly seven days, so an exact boundary hit is never produced twice.
pub fn next_occurrence(rule: &Rule, after: DateTime<FixedOffset>) -> Schedule {
    let tz = after.timezone();
    let days_back = (after.weekday().num_days_from_sunday() as i64
        - rule.weekday.num_days_from_sunday() as i64)
        .rem_euclid(7);
    let date = after.date_naive() - Duration::days(days_back);
    let naive = date
        .and_hms_opt(rule.start_hour, rule.start_minute, 0)
        .expect("start time validated at rule load");
    let mut start = tz
        .from_local_datetime(&naive)
        .single()
        .expect("fixed offset mapping is unambiguous");
    if start <= after {
        start += Duration::days(7);
    }
    Schedule {
        rule_name: rule.name.clone(),
        station_id: rule.station_id.clone(),
        start_time: start,
        duration: rule.duration,
        fetch_time: start + rule.fetch_offset,
    }
}

/// Returns the next `n` occurrences of `rule`, strictly increasing in
/// start time.
///
/// The search starts from `now - fetch_offset` so an occurrence whose
/// archive is not yet retrievable is still offered; each result's start
/// time becomes the reference for the next iteration.
pub fn next_schedules(rule: &Rule, n: usize, now: DateTime<FixedOffset>) -> Vec<Schedule> {
    let mut schedules = Vec::with_capacity(n);
    let mut reference = now - rule.fetch_offset;
    for _ in 0..n {
        let schedule = next_occurrence(rule, reference);
        reference = schedule.start_time;
        schedules.push(schedule);
    }
    schedules
}

/// Materializes the upcoming schedules for a whole rule set, sorted in the
/// canonical dispatch order (ascending fetch time). The dispatcher's
/// single-timer loop relies on this ordering.
pub fn upcoming_schedules(
    rules: &[Rule],
    per_rule: usize,
    now: DateTime<FixedOffset>,
) -> Vec<Schedule> {
    let mut schedules: Vec<Schedule> = rules
        .iter()
        .flat_map(|rule| next_schedules(rule, per_rule, now))
        .collect();
    schedules.sort_by(|a, b| a.queue_key().cmp(&b.queue_key()));
    schedules
}
