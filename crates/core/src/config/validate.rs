use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Paths are non-empty (out_dir, rules_path)
/// - Station offset is a representable timezone
/// - Concurrency, retry, and deadline settings are positive
/// - Feed server settings are complete when the server is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.out_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "out_dir cannot be empty".to_string(),
        ));
    }
    if config.rules_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "rules_path cannot be empty".to_string(),
        ));
    }
    if !(-23..=23).contains(&config.station.utc_offset_hours) {
        return Err(ConfigError::ValidationError(format!(
            "station.utc_offset_hours must be between -23 and 23, got {}",
            config.station.utc_offset_hours
        )));
    }
    if config.scheduler.job_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.job_timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.scheduler.horizon_per_rule == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.horizon_per_rule cannot be 0".to_string(),
        ));
    }
    if config.downloader.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "downloader.max_concurrent cannot be 0".to_string(),
        ));
    }
    if config.downloader.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "downloader.max_attempts cannot be 0".to_string(),
        ));
    }
    if config.provider.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.base_url cannot be empty".to_string(),
        ));
    }

    if config.server.enabled {
        if config.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port cannot be 0".to_string(),
            ));
        }
        if config.server.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "server.base_url is required when the feed server is enabled".to_string(),
            ));
        }
    }

    Ok(())
}
