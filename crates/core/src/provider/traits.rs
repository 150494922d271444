//! Trait definition for the broadcast provider capability.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use super::error::ProviderError;
use super::types::ProgramMeta;
use crate::rules::StationId;

/// External capability resolving program metadata and chunk playlists for
/// a station/time window.
///
/// Implementations must be ready to serve requests when handed to the
/// fetch orchestrator; authentication and session renewal are the
/// caller's concern.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Resolves the program broadcast on `station` starting at `start`.
    async fn resolve_program(
        &self,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<ProgramMeta, ProviderError>;

    /// Resolves the ordered chunk URL list for the same window.
    async fn resolve_chunklist(
        &self,
        station: &StationId,
        start: DateTime<FixedOffset>,
    ) -> Result<Vec<String>, ProviderError>;
}
