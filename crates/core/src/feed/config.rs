//! Feed channel configuration.

use serde::{Deserialize, Serialize};

/// Channel-level fields of the published podcast feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            author: default_author(),
            language: default_language(),
        }
    }
}

fn default_title() -> String {
    "airshift recordings".to_string()
}

fn default_description() -> String {
    "Recorded time-shifted radio broadcasts".to_string()
}

fn default_author() -> String {
    "airshift".to_string()
}

fn default_language() -> String {
    "ja".to_string()
}
