//! Pipeline sequencing and cleanup guarantees.
//!
//! The run is a strict sequence of stages; a failure at any stage aborts
//! without invoking later stages. Cleanup is coupled to individual stage
//! success, not overall success: the source file is deleted as soon as
//! segmentation succeeds, while the output directory survives any later
//! failure and is only deleted after publishing.

use crate::segmenter::Segmenter;
use crate::{cleaner, compress, integrity, publisher::Publisher};
use hlspress_core::PipelineError;
use hlspress_storage::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stages of a pipeline run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    Verified,
    Segmented,
    Compressed,
    Published,
    Cleaned,
    Aborted,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Init => "init",
            PipelineStage::Verified => "verified",
            PipelineStage::Segmented => "segmented",
            PipelineStage::Compressed => "compressed",
            PipelineStage::Published => "published",
            PipelineStage::Cleaned => "cleaned",
            PipelineStage::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Public URL of the published entry manifest.
    pub playlist_url: String,
    /// Source file that was consumed (now deleted).
    pub source: PathBuf,
    /// Output directory that was published (now deleted).
    pub output_dir: PathBuf,
    /// Number of playlist manifests that were gzip-compressed.
    pub manifest_count: usize,
}

/// Sequences verify → segment → compress → publish → clean.
pub struct Pipeline {
    segmenter: Arc<dyn Segmenter>,
    storage: Arc<dyn Storage>,
}

impl Pipeline {
    pub fn new(segmenter: Arc<dyn Segmenter>, storage: Arc<dyn Storage>) -> Self {
        Self { segmenter, storage }
    }

    /// Run the full pipeline on `source`.
    pub async fn run(&self, source: &Path) -> Result<PipelineReport, PipelineError> {
        self.execute(source).await.map_err(|e| {
            tracing::error!(
                stage = %PipelineStage::Aborted,
                step = e.step(),
                source = %source.display(),
                error = %e,
                "Pipeline aborted"
            );
            e
        })
    }

    async fn execute(&self, source: &Path) -> Result<PipelineReport, PipelineError> {
        let mut stage = PipelineStage::Init;

        // Verify container framing before anything touches the filesystem
        // beyond reading the input.
        let data = tokio::fs::read(source).await.map_err(|e| {
            PipelineError::InvalidInput(format!("failed to read {}: {}", source.display(), e))
        })?;
        if !integrity::is_valid_mp4(&data) {
            return Err(PipelineError::InvalidInput(format!(
                "{} is not a structurally valid MP4 container",
                source.display()
            )));
        }
        drop(data);
        stage = self.advance(stage, PipelineStage::Verified, source);

        let output_dir = self.segmenter.run(source).await?;
        stage = self.advance(stage, PipelineStage::Segmented, source);

        // Ownership of the source transfers to the cleaner once
        // segmentation has succeeded.
        cleaner::remove_source(source).await?;

        let manifest_count = compress::compress_manifests(&output_dir).await?;
        stage = self.advance(stage, PipelineStage::Compressed, source);

        let playlist_url = Publisher::new(self.storage.clone())
            .publish(&output_dir)
            .await?;
        stage = self.advance(stage, PipelineStage::Published, source);

        cleaner::remove_output(&output_dir).await?;
        let stage = self.advance(stage, PipelineStage::Cleaned, source);

        tracing::info!(
            stage = %stage,
            source = %source.display(),
            playlist_url = %playlist_url,
            "Pipeline completed"
        );

        Ok(PipelineReport {
            playlist_url,
            source: source.to_path_buf(),
            output_dir,
            manifest_count,
        })
    }

    fn advance(&self, from: PipelineStage, to: PipelineStage, source: &Path) -> PipelineStage {
        tracing::debug!(
            from = %from,
            to = %to,
            source = %source.display(),
            "Pipeline stage transition"
        );
        to
    }
}
