//! HTTP provider backend.
//!
//! Speaks a generic time-shift archive contract: program metadata as JSON
//! under `/programs/{station}/{yyyymmddhhmmss}`, the chunk playlist as an
//! HLS-style document under `/playlists/{station}/{yyyymmddhhmmss}.m3u8`.
//! One level of master-playlist indirection is followed.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use super::config::ProviderConfig;
use super::error::ProviderError;
use super::playlist::{entry_urls, is_playlist_ref};
use super::traits::Provider;
use super::types::ProgramMeta;
use crate::rules::StationId;

/// Provider implementation backed by an HTTP archive endpoint.
pub struct HttpProvider {
    client: Client,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Creates a new HTTP provider from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn program_url(&self, station: &StationId, start: DateTime<FixedOffset>) -> String {
        format!(
            "{}/programs/{}/{}",
            self.base(),
            station,
            start.format("%Y%m%d%H%M%S")
        )
    }

    fn playlist_url(&self, station: &StationId, start: DateTime<FixedOffset>) -> String {
        format!(
            "{}/playlists/{}/{}.m3u8",
            self.base(),
            station,
            start.format("%Y%m%d%H%M%S")
        )
    }

    async fn fetch_playlist(
        &self,
        url: &Url,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<String, ProviderError> {
        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound {
                station: station.to_string(),
                start,
            }),
            status if !status.is_success() => Err(ProviderError::BadStatus {
                status: status.as_u16(),
            }),
            _ => Ok(response.text().await?),
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn resolve_program(
        &self,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<ProgramMeta, ProviderError> {
        let url = self.program_url(station, start);
        debug!(%url, "resolving program metadata");
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound {
                station: station.to_string(),
                start,
            }),
            status if !status.is_success() => Err(ProviderError::BadStatus {
                status: status.as_u16(),
            }),
            _ => Ok(response.json().await?),
        }
    }

    async fn resolve_chunklist(
        &self,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<Vec<String>, ProviderError> {
        let url = Url::parse(&self.playlist_url(station, start))
            .map_err(|e| ProviderError::Parse(format!("bad playlist URL: {e}")))?;
        debug!(%url, "resolving chunk playlist");

        let body = self.fetch_playlist(&url, station, start).await?;
        let mut entries = entry_urls(&body, &url)?;

        // Master playlist: the first variant points at the actual chunklist.
        if entries.first().map(is_playlist_ref).unwrap_or(false) {
            let child = entries[0].clone();
            debug!(url = %child, "following master playlist");
            let child_body = self.fetch_playlist(&child, station, start).await?;
            entries = entry_urls(&child_body, &child)?;
        }

        if entries.is_empty() {
            return Err(ProviderError::EmptyPlaylist);
        }
        Ok(entries.into_iter().map(String::from).collect())
    }
}
