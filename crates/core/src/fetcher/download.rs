//! Bulk chunk downloader.
//!
//! Downloads a playlist's worth of chunk URLs into a working directory
//! under a counting admission gate, retrying each chunk up to a fixed
//! attempt cap. One chunk exhausting its attempts fails the whole batch
//! and drops the in-flight siblings: partial media is useless.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::config::DownloaderConfig;
use super::error::{ChunkError, FetchError};

/// Semaphore-gated chunk downloader shared by all jobs.
pub struct BulkDownloader {
    client: Client,
    config: DownloaderConfig,
}

impl BulkDownloader {
    /// Creates a new downloader from configuration.
    pub fn new(config: DownloaderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to create HTTP client");
        Self { client, config }
    }

    /// Downloads every URL into `dest_dir` as `prefix + original filename`.
    ///
    /// On success the returned paths cover all requested URLs. On failure
    /// the destination may hold files for chunks that completed before the
    /// batch aborted; the caller owns the directory and cleans it up.
    pub async fn download_all(
        &self,
        urls: &[String],
        dest_dir: &Path,
        prefix: &str,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let gate = Arc::new(Semaphore::new(self.config.max_concurrent));
        let downloads = urls.iter().map(|url| {
            let gate = Arc::clone(&gate);
            async move {
                let _permit = gate.acquire().await.expect("admission gate never closed");
                self.fetch_chunk(url, dest_dir, prefix).await
            }
        });
        // try_join_all drops the remaining futures on the first error,
        // cancelling in-flight siblings.
        let paths = future::try_join_all(downloads).await?;
        debug!(chunks = paths.len(), dir = %dest_dir.display(), "bulk download complete");
        Ok(paths)
    }

    async fn fetch_chunk(
        &self,
        url: &str,
        dest_dir: &Path,
        prefix: &str,
    ) -> Result<PathBuf, FetchError> {
        let dest = dest_dir.join(format!("{prefix}{}", chunk_filename(url)));
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_fetch(url, &dest).await {
                Ok(()) => return Ok(dest),
                Err(e) if attempts < self.config.max_attempts => {
                    warn!(url, attempts, error = %e, "chunk download failed, retrying");
                }
                Err(e) => {
                    return Err(FetchError::ChunkDownload {
                        url: url.to_string(),
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str, dest: &Path) -> Result<(), ChunkError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        // The file is written in one shot after the full body arrived, so
        // a present file is never a truncated download.
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

/// Last path segment of a chunk URL, without query or fragment.
fn chunk_filename(url: &str) -> &str {
    let path = url
        .split_once(['?', '#'])
        .map(|(path, _)| path)
        .unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
