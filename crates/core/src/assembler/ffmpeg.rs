//! FFmpeg-based assembler implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::fs;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::AssemblerConfig;
use super::error::AssemblerError;
use super::traits::{Assembler, AssemblyResult};

/// Assembler that joins chunks losslessly with `ffmpeg -f concat -c copy`.
pub struct FfmpegAssembler {
    config: AssemblerConfig,
}

impl FfmpegAssembler {
    /// Creates a new ffmpeg assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Creates an assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AssemblerConfig::default())
    }

    /// Collects the chunk files from the working directory in playback
    /// order.
    ///
    /// Chunk filenames embed a monotonic index, so lexicographic path
    /// order equals playback order. This is an upstream naming contract;
    /// if the naming scheme ever changes, ordering has to come from the
    /// playlist sequence instead.
    async fn collect_chunks(&self, work_dir: &Path) -> Result<Vec<PathBuf>, AssemblerError> {
        let mut chunks = Vec::new();
        let mut entries = fs::read_dir(work_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == self.config.chunk_extension)
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
        Ok(chunks)
    }

    /// Writes the ffmpeg concat demuxer manifest.
    async fn write_manifest(
        &self,
        work_dir: &Path,
        chunks: &[PathBuf],
    ) -> Result<PathBuf, AssemblerError> {
        let manifest_path = work_dir.join("concat.txt");
        let mut manifest = String::new();
        for chunk in chunks {
            manifest.push_str(&format!("file '{}'\n", chunk.display()));
        }
        fs::write(&manifest_path, manifest).await?;
        Ok(manifest_path)
    }

    async fn run_concat(
        &self,
        manifest_path: &Path,
        concat_path: &Path,
    ) -> Result<(), AssemblerError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .args(["-f", "concat", "-safe", "0", "-y", "-i"])
            .arg(manifest_path)
            .args(["-c", "copy", "-loglevel", "error"])
            .arg(concat_path)
            .stdin(Stdio::null())
            .output();

        let output = timeout(Duration::from_secs(self.config.timeout_secs), output)
            .await
            .map_err(|_| AssemblerError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssemblerError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    AssemblerError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AssemblerError::concat_failed(
                format!("ffmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }
        Ok(())
    }

    /// Moves the finished concat output into place.
    ///
    /// Rename first; a cross-filesystem move falls back to copying into a
    /// hidden sibling of the destination and renaming that, so the final
    /// path never holds a partial file.
    async fn place_output(&self, concat_path: &Path, output_path: &Path) -> Result<(), AssemblerError> {
        match fs::rename(concat_path, output_path).await {
            Ok(()) => Ok(()),
            Err(e)
                if e.kind() == std::io::ErrorKind::CrossesDevices
                    || e.raw_os_error() == Some(18) =>
            {
                let file_name = output_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("concat.out");
                let staging = match output_path.parent() {
                    Some(parent) => parent.join(format!(".{file_name}.part")),
                    None => PathBuf::from(format!(".{file_name}.part")),
                };
                fs::copy(concat_path, &staging).await?;
                fs::rename(&staging, output_path).await?;
                fs::remove_file(concat_path).await?;
                Ok(())
            }
            Err(e) => Err(AssemblerError::Io(e)),
        }
    }
}

#[async_trait]
impl Assembler for FfmpegAssembler {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn assemble(
        &self,
        work_dir: &Path,
        output_path: &Path,
    ) -> Result<AssemblyResult, AssemblerError> {
        let start = Instant::now();

        let chunks = self.collect_chunks(work_dir).await?;
        debug!(chunks = chunks.len(), dir = %work_dir.display(), "assembling chunks");

        let manifest_path = self.write_manifest(work_dir, &chunks).await?;
        let concat_path = work_dir.join(format!("concat.{}", self.config.chunk_extension));
        self.run_concat(&manifest_path, &concat_path).await?;
        self.place_output(&concat_path, output_path).await?;

        let output_meta = fs::metadata(output_path)
            .await
            .map_err(|_| AssemblerError::concat_failed("output file not created", None))?;

        Ok(AssemblyResult {
            output_path: output_path.to_path_buf(),
            chunk_count: chunks.len(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), AssemblerError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(AssemblerError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(AssemblerError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assembler() -> FfmpegAssembler {
        FfmpegAssembler::with_defaults()
    }

    #[tokio::test]
    async fn collect_chunks_sorts_lexicographically() {
        let temp = TempDir::new().unwrap();
        for name in ["p_0003.aac", "p_0001.aac", "p_0002.aac"] {
            fs::write(temp.path().join(name), b"x").await.unwrap();
        }
        // Non-chunk files are ignored.
        fs::write(temp.path().join("concat.txt"), b"x").await.unwrap();
        fs::write(temp.path().join("notes.md"), b"x").await.unwrap();

        let chunks = assembler().collect_chunks(temp.path()).await.unwrap();
        let names: Vec<_> = chunks
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["p_0001.aac", "p_0002.aac", "p_0003.aac"]);
    }

    #[tokio::test]
    async fn empty_work_dir_is_no_chunks_error() {
        let temp = TempDir::new().unwrap();
        let err = assembler().collect_chunks(temp.path()).await.unwrap_err();
        assert!(matches!(err, AssemblerError::NoChunks { .. }));
    }

    #[tokio::test]
    async fn manifest_references_chunks_in_order() {
        let temp = TempDir::new().unwrap();
        let chunks = vec![
            temp.path().join("p_0001.aac"),
            temp.path().join("p_0002.aac"),
        ];
        let manifest_path = assembler()
            .write_manifest(temp.path(), &chunks)
            .await
            .unwrap();
        let manifest = fs::read_to_string(&manifest_path).await.unwrap();
        let lines: Vec<_> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file '"));
        assert!(lines[0].contains("p_0001.aac"));
        assert!(lines[1].contains("p_0002.aac"));
    }

    #[tokio::test]
    async fn missing_ffmpeg_binary_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("p_0001.aac"), b"x").await.unwrap();

        let assembler = FfmpegAssembler::new(AssemblerConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ..AssemblerConfig::default()
        });
        let err = assembler
            .assemble(temp.path(), &temp.path().join("out.aac"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssemblerError::FfmpegNotFound { .. }));
    }

    #[tokio::test]
    async fn validate_fails_without_binary() {
        let assembler = FfmpegAssembler::new(AssemblerConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ..AssemblerConfig::default()
        });
        assert!(matches!(
            assembler.validate().await,
            Err(AssemblerError::FfmpegNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn place_output_renames_into_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("concat.aac");
        let dst = temp.path().join("final.aac");
        fs::write(&src, b"joined").await.unwrap();

        assembler().place_output(&src, &dst).await.unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"joined");
    }
}
