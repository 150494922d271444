//! Broadcast provider capability: program metadata and chunk playlists.

mod config;
mod error;
mod http;
mod playlist;
mod traits;
mod types;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use http::HttpProvider;
pub use playlist::{entry_urls, is_playlist_ref};
pub use traits::Provider;
pub use types::ProgramMeta;
