//! Program metadata types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::rules::StationId;

/// Metadata of one broadcast program as resolved from the provider.
///
/// Serialized as-is into the JSON sidecar next to the media artifact; the
/// podcast feed reads the same sidecars back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMeta {
    pub station_id: StationId,
    pub title: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub performer: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub url: String,
}

impl ProgramMeta {
    /// Deterministic artifact stem: `{yyyymmddhhmmss}_{station}_{title}`.
    ///
    /// Path separators in the title are flattened so the stem stays a
    /// single path component.
    pub fn artifact_stem(&self) -> String {
        let title: String = self
            .title
            .chars()
            .map(|c| if c == '/' || c == '\\' { '-' } else { c })
            .collect();
        format!(
            "{}_{}_{}",
            self.start_time.format("%Y%m%d%H%M%S"),
            self.station_id,
            title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn meta(title: &str) -> ProgramMeta {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        ProgramMeta {
            station_id: StationId::from("LFR"),
            title: title.to_string(),
            start_time: jst.with_ymd_and_hms(2023, 10, 3, 1, 0, 0).unwrap(),
            end_time: jst.with_ymd_and_hms(2023, 10, 3, 3, 0, 0).unwrap(),
            performer: String::new(),
            info: String::new(),
            url: String::new(),
        }
    }

    #[test]
    fn artifact_stem_is_deterministic() {
        assert_eq!(meta("Night Show").artifact_stem(), "20231003010000_LFR_Night Show");
    }

    #[test]
    fn artifact_stem_flattens_path_separators() {
        assert_eq!(meta("a/b\\c").artifact_stem(), "20231003010000_LFR_a-b-c");
    }

    #[test]
    fn meta_round_trips_through_json() {
        let original = meta("ラジオ深夜便");
        let json = serde_json::to_string(&original).unwrap();
        let back: ProgramMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
