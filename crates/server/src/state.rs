use std::path::{Path, PathBuf};

use airshift_core::{Config, FeedConfig};

/// Shared application state for the feed server.
pub struct AppState {
    out_dir: PathBuf,
    base_url: String,
    media_extension: String,
    feed: FeedConfig,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            out_dir: config.out_dir.clone(),
            base_url: config.server.base_url.clone(),
            media_extension: config.assembler.chunk_extension.clone(),
            feed: config.feed.clone(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn media_extension(&self) -> &str {
        &self.media_extension
    }

    pub fn feed(&self) -> &FeedConfig {
        &self.feed
    }
}
