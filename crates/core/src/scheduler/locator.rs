//! Time-shift locator parsing for ad-hoc fetches.

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex_lite::Regex;

use crate::fetcher::FetchError;
use crate::rules::{Schedule, StationId};

/// Parses a provider time-shift locator (".../ts/{STATION}/{yyyymmddhhmmss}")
/// into a synthetic schedule whose fetch time is now.
pub fn parse_timeshift_locator(input: &str, tz: FixedOffset) -> Result<Schedule, FetchError> {
    let invalid = || FetchError::InvalidLocator {
        input: input.to_string(),
    };

    let pattern = Regex::new(r"/ts/([A-Za-z0-9_-]+)/([0-9]{14})$").expect("valid locator pattern");
    let captures = pattern.captures(input).ok_or_else(invalid)?;
    let station = StationId::from(captures.get(1).ok_or_else(invalid)?.as_str());
    let stamp = captures.get(2).ok_or_else(invalid)?.as_str();

    let naive =
        NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").map_err(|_| invalid())?;
    let start_time = tz.from_local_datetime(&naive).single().ok_or_else(invalid)?;

    Ok(Schedule {
        rule_name: "adhoc".to_string(),
        station_id: station,
        start_time,
        duration: chrono::Duration::zero(),
        fetch_time: Utc::now().with_timezone(&tz),
    })
}
