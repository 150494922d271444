use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;

use crate::assembler::AssemblerConfig;
use crate::feed::FeedConfig;
use crate::fetcher::{DownloaderConfig, FetcherConfig};
use crate::provider::ProviderConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory receiving sidecar and media artifacts.
    pub out_dir: PathBuf,
    /// TOML file holding the recording rules.
    pub rules_path: PathBuf,
    /// Scratch directory for per-job working directories.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub assembler: AssemblerConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl Config {
    /// The fixed station-local timezone.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.station.utc_offset_hours * 3600)
            .expect("station offset validated")
    }

    /// Default fetch offset applied to rules without their own.
    pub fn default_fetch_offset(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.scheduler.fetch_offset_mins as i64)
    }

    pub fn planner_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.planner_interval_secs)
    }

    /// Settings handed to the fetch orchestrator.
    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            out_dir: self.out_dir.clone(),
            work_dir: self.work_dir.clone(),
            job_timeout_secs: self.scheduler.job_timeout_secs,
            media_extension: self.assembler.chunk_extension.clone(),
        }
    }
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Station timezone configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    /// UTC offset of the station-local timezone in whole hours
    /// (default: +9, JST).
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    9
}

/// Scheduling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Minutes after broadcast start before the archive is retrievable
    /// (default: 360).
    #[serde(default = "default_fetch_offset_mins")]
    pub fetch_offset_mins: u32,
    /// Seconds between planner recomputations (default: 600).
    #[serde(default = "default_planner_interval_secs")]
    pub planner_interval_secs: u64,
    /// Per-job deadline in seconds (default: 1800). Must cover resolving,
    /// downloading and concatenating a full multi-hour broadcast.
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
    /// Occurrences materialized per rule on each recomputation
    /// (default: 3).
    #[serde(default = "default_horizon_per_rule")]
    pub horizon_per_rule: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_offset_mins: default_fetch_offset_mins(),
            planner_interval_secs: default_planner_interval_secs(),
            job_timeout_secs: default_job_timeout_secs(),
            horizon_per_rule: default_horizon_per_rule(),
        }
    }
}

fn default_fetch_offset_mins() -> u32 {
    360
}

fn default_planner_interval_secs() -> u64 {
    600
}

fn default_job_timeout_secs() -> u64 {
    1800
}

fn default_horizon_per_rule() -> usize {
    3
}

/// Feed server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used in feed enclosure links,
    /// e.g. "https://feed.example.com".
    #[serde(default)]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_host(),
            port: default_port(),
            base_url: String::new(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().expect("valid default host")
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
out_dir = "/var/lib/airshift/out"
rules_path = "/etc/airshift/rules.toml"

[provider]
base_url = "https://archive.example.com"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.station.utc_offset_hours, 9);
        assert_eq!(config.scheduler.fetch_offset_mins, 360);
        assert_eq!(config.scheduler.planner_interval_secs, 600);
        assert_eq!(config.scheduler.job_timeout_secs, 1800);
        assert_eq!(config.scheduler.horizon_per_rule, 3);
        assert_eq!(config.downloader.max_concurrent, 64);
        assert_eq!(config.downloader.max_attempts, 3);
        assert_eq!(config.assembler.chunk_extension, "aac");
        assert!(!config.server.enabled);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn missing_out_dir_fails() {
        let result: Result<Config, _> = toml::from_str(
            r#"
rules_path = "/etc/airshift/rules.toml"

[provider]
base_url = "https://archive.example.com"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_provider_fails() {
        let result: Result<Config, _> = toml::from_str(
            r#"
out_dir = "/out"
rules_path = "/rules.toml"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
out_dir = "/out"
rules_path = "/rules.toml"
work_dir = "/scratch"

[station]
utc_offset_hours = 0

[scheduler]
fetch_offset_mins = 120
job_timeout_secs = 3600

[downloader]
max_concurrent = 8
max_attempts = 5

[assembler]
chunk_extension = "mp3"

[provider]
base_url = "https://archive.example.com"
timeout_secs = 10

[server]
enabled = true
port = 9000
base_url = "https://feed.example.com"

[feed]
title = "my feed"
"#,
        )
        .unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/scratch"));
        assert_eq!(config.station.utc_offset_hours, 0);
        assert_eq!(config.scheduler.fetch_offset_mins, 120);
        assert_eq!(config.downloader.max_concurrent, 8);
        assert_eq!(config.assembler.chunk_extension, "mp3");
        assert_eq!(config.provider.timeout_secs, 10);
        assert!(config.server.enabled);
        assert_eq!(config.feed.title, "my feed");
    }

    #[test]
    fn derived_accessors() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.timezone(), FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(config.default_fetch_offset(), chrono::Duration::hours(6));
        assert_eq!(config.planner_interval(), Duration::from_secs(600));
        let fetcher = config.fetcher();
        assert_eq!(fetcher.out_dir, PathBuf::from("/var/lib/airshift/out"));
        assert_eq!(fetcher.media_extension, "aac");
    }
}
