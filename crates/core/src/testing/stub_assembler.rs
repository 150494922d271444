//! Stub assembler that concatenates chunk bytes directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::assembler::{Assembler, AssemblerError, AssemblyResult};

/// Assembler double: joins chunk files by byte concatenation, no external
/// tool involved. Chunk ordering matches the real assembler
/// (lexicographic by path).
pub struct StubAssembler {
    chunk_extension: String,
}

impl StubAssembler {
    pub fn new() -> Self {
        Self {
            chunk_extension: "aac".to_string(),
        }
    }
}

impl Default for StubAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assembler for StubAssembler {
    fn name(&self) -> &str {
        "stub"
    }

    async fn assemble(
        &self,
        work_dir: &Path,
        output_path: &Path,
    ) -> Result<AssemblyResult, AssemblerError> {
        let mut chunks: Vec<PathBuf> = Vec::new();
        let mut entries = tokio::fs::read_dir(work_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == self.chunk_extension)
                .unwrap_or(false);
            if matches_ext {
                chunks.push(path);
            }
        }
        chunks.sort();
        if chunks.is_empty() {
            return Err(AssemblerError::NoChunks {
                dir: work_dir.to_path_buf(),
            });
        }

        let mut joined = Vec::new();
        for chunk in &chunks {
            joined.extend(tokio::fs::read(chunk).await?);
        }
        tokio::fs::write(output_path, &joined).await?;

        Ok(AssemblyResult {
            output_path: output_path.to_path_buf(),
            chunk_count: chunks.len(),
            output_size_bytes: joined.len() as u64,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), AssemblerError> {
        Ok(())
    }
}
