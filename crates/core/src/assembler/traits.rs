//! Trait definition for the assembler module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::AssemblerError;

/// Result of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    pub output_path: PathBuf,
    pub chunk_count: usize,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}

/// An assembler that joins a directory of downloaded chunk files into one
/// contiguous media artifact.
#[async_trait]
pub trait Assembler: Send + Sync {
    /// Returns the name of this assembler implementation.
    fn name(&self) -> &str;

    /// Joins the chunk files found in `work_dir` into `output_path`.
    ///
    /// The final artifact appears at `output_path` only on success; a
    /// failed run must not leave a partial file there.
    async fn assemble(
        &self,
        work_dir: &Path,
        output_path: &Path,
    ) -> Result<AssemblyResult, AssemblerError>;

    /// Validates that the assembler is properly configured and ready.
    async fn validate(&self) -> Result<(), AssemblerError>;
}
