//! Error types module
//!
//! The pipeline error taxonomy. Every step failure maps to exactly one
//! variant; no step recovers from another step's failure, so the variant
//! also determines the process exit code.

/// Pipeline failure, one variant per step.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input bytes are not a structurally valid container.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external segmenter failed or produced unusable output.
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    /// I/O error while rewriting a playlist manifest.
    #[error("Manifest compression failed: {0}")]
    Compression(String),

    /// Storage error while publishing an output file.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Local artifact removal failed. Disk usage grows if this is ignored.
    #[error("Cleanup failed: {0}")]
    Cleanup(String),

    /// Missing or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Process exit code for this failure class.
    ///
    /// 1 usage/config, 2 integrity, 3 segmentation, 4 publish,
    /// 5 compression, 6 cleanup. 0 is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 1,
            PipelineError::InvalidInput(_) => 2,
            PipelineError::Segmentation(_) => 3,
            PipelineError::Upload(_) => 4,
            PipelineError::Compression(_) => 5,
            PipelineError::Cleanup(_) => 6,
        }
    }

    /// Name of the pipeline step that produced this error.
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "verify",
            PipelineError::Segmentation(_) => "segment",
            PipelineError::Compression(_) => "compress",
            PipelineError::Upload(_) => "publish",
            PipelineError::Cleanup(_) => "clean",
            PipelineError::Config(_) => "config",
        }
    }
}
