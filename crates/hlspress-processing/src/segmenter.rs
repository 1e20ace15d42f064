//! External segmenter invocation.
//!
//! The segmenter is a capability trait so the pipeline can be driven by a
//! fixture implementation in tests. The production implementation shells
//! out to the segmenter binary and verifies its output explicitly: the
//! exit status is checked, the output directory must exist, and the entry
//! manifest must be present before anything downstream runs.

use async_trait::async_trait;
use hlspress_core::{Config, PipelineError, MASTER_PLAYLIST};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Fragmentation mode passed to the segmenter.
const HLS_TYPE: &str = "fmp4";

/// Extension of the segmenter's output directory.
const OUTPUT_EXTENSION: &str = "fmp4";

/// Produces an HLS output directory from a source video.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Segment `source` into a sibling output directory and return its path.
    /// Must not delete the source on failure.
    async fn run(&self, source: &Path) -> Result<PathBuf, PipelineError>;
}

/// Segmenter backed by an external binary accepting
/// `--output <dir> --hls-type fmp4 <input>`.
pub struct CommandSegmenter {
    binary_path: String,
    timeout: Duration,
}

impl CommandSegmenter {
    pub fn new(binary_path: String, timeout: Duration) -> Self {
        Self {
            binary_path,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.segmenter_path.clone(),
            Duration::from_secs(config.segmenter_timeout_secs),
        )
    }

    /// Output directory for a source: same base name, `.fmp4` extension.
    pub fn output_dir_for(source: &Path) -> PathBuf {
        source.with_extension(OUTPUT_EXTENSION)
    }

    /// Verify that segmentation actually produced a usable output tree.
    async fn verify_output(output_dir: &Path) -> Result<(), PipelineError> {
        let metadata = tokio::fs::metadata(output_dir).await.map_err(|_| {
            PipelineError::Segmentation(format!(
                "segmenter did not create output directory {}",
                output_dir.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(PipelineError::Segmentation(format!(
                "segmenter output {} is not a directory",
                output_dir.display()
            )));
        }

        let master = output_dir.join(MASTER_PLAYLIST);
        if !tokio::fs::try_exists(&master).await.unwrap_or(false) {
            return Err(PipelineError::Segmentation(format!(
                "segmenter output is missing {} in {}",
                MASTER_PLAYLIST,
                output_dir.display()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Segmenter for CommandSegmenter {
    #[tracing::instrument(skip(self, source), fields(
        process.executable.path = %self.binary_path,
        source = %source.display(),
    ))]
    async fn run(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let output_dir = Self::output_dir_for(source);
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.binary_path);
        command
            .arg("--output")
            .arg(&output_dir)
            .arg("--hls-type")
            .arg(HLS_TYPE)
            .arg(source)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                PipelineError::Segmentation(format!(
                    "segmenter timed out after {}s on {}",
                    self.timeout.as_secs(),
                    source.display()
                ))
            })?
            .map_err(|e| {
                PipelineError::Segmentation(format!(
                    "failed to execute segmenter {}: {}",
                    self.binary_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Segmentation(format!(
                "segmenter exited with {} on {}: {}",
                output.status,
                source.display(),
                stderr.trim()
            )));
        }

        Self::verify_output(&output_dir).await?;

        tracing::info!(
            source = %source.display(),
            output_dir = %output_dir.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Segmentation completed"
        );

        Ok(output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_dir_for() {
        assert_eq!(
            CommandSegmenter::output_dir_for(Path::new("path/to/clip.mp4")),
            PathBuf::from("path/to/clip.fmp4")
        );
        assert_eq!(
            CommandSegmenter::output_dir_for(Path::new("clip")),
            PathBuf::from("clip.fmp4")
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_segmentation_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        tokio::fs::write(&source, b"x").await.unwrap();

        let segmenter = CommandSegmenter::new(
            dir.path().join("no-such-binary").display().to_string(),
            Duration::from_secs(5),
        );
        let err = segmenter.run(&source).await.unwrap_err();
        assert!(matches!(err, PipelineError::Segmentation(_)));
        // Source is preserved on failure
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_verify_output_missing_dir() {
        let dir = tempdir().unwrap();
        let err = CommandSegmenter::verify_output(&dir.path().join("clip.fmp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Segmentation(_)));
    }

    #[tokio::test]
    async fn test_verify_output_missing_master_playlist() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("clip.fmp4");
        tokio::fs::create_dir_all(&out).await.unwrap();
        tokio::fs::write(out.join("seg0.mp4"), b"x").await.unwrap();

        let err = CommandSegmenter::verify_output(&out).await.unwrap_err();
        assert!(err.to_string().contains("index.m3u8"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_stub_segmenter() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        tokio::fs::write(&source, b"x").await.unwrap();

        // Stub binary honoring the --output/--hls-type contract
        let script = dir.path().join("stub-segmenter");
        tokio::fs::write(
            &script,
            "#!/bin/sh\nout=\"$2\"\nmkdir -p \"$out\"\nprintf '#EXTM3U\\n' > \"$out/index.m3u8\"\n",
        )
        .await
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let segmenter =
            CommandSegmenter::new(script.display().to_string(), Duration::from_secs(30));
        let output_dir = segmenter.run(&source).await.unwrap();

        assert_eq!(output_dir, dir.path().join("clip.fmp4"));
        assert!(output_dir.join("index.m3u8").exists());
        // Segmentation never deletes the source; that is the cleaner's job
        assert!(source.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_nonzero_exit_surfaces_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        tokio::fs::write(&source, b"x").await.unwrap();

        let script = dir.path().join("failing-segmenter");
        tokio::fs::write(&script, "#!/bin/sh\necho 'codec unsupported' >&2\nexit 3\n")
            .await
            .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let segmenter =
            CommandSegmenter::new(script.display().to_string(), Duration::from_secs(30));
        let err = segmenter.run(&source).await.unwrap_err();
        assert!(err.to_string().contains("codec unsupported"));
        assert!(source.exists());
    }
}
