//! Mock provider returning canned metadata and chunk lists.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::provider::{ProgramMeta, Provider, ProviderError};
use crate::rules::StationId;

/// Provider double with a fixed chunk URL list.
pub struct MockProvider {
    chunk_urls: Vec<String>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new(chunk_urls: Vec<String>) -> Self {
        Self {
            chunk_urls,
            delay: None,
        }
    }

    /// Adds an artificial delay before metadata resolution, for deadline
    /// tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn resolve_program(
        &self,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<ProgramMeta, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ProgramMeta {
            station_id: station.clone(),
            title: "Mock Program".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::hours(2),
            performer: "mock host".to_string(),
            info: "canned program".to_string(),
            url: String::new(),
        })
    }

    async fn resolve_chunklist(
        &self,
        _station: &StationId,
        _start: DateTime<FixedOffset>,
    ) -> Result<Vec<String>, ProviderError> {
        if self.chunk_urls.is_empty() {
            return Err(ProviderError::EmptyPlaylist);
        }
        Ok(self.chunk_urls.clone())
    }
}
