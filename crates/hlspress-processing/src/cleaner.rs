//! Removal of local artifacts after their pipeline stage completes.
//!
//! Both removals are destructive and unrecoverable, so they run only after
//! the step that consumed the artifact has succeeded: the source file after
//! segmentation, the output directory after publishing. Removal failures
//! are surfaced; swallowing them grows local disk usage silently.

use hlspress_core::PipelineError;
use std::path::Path;
use tokio::fs;

/// Delete the source video. Call only after successful segmentation.
pub async fn remove_source(source: &Path) -> Result<(), PipelineError> {
    fs::remove_file(source).await.map_err(|e| {
        PipelineError::Cleanup(format!("failed to remove source {}: {}", source.display(), e))
    })?;

    tracing::info!(source = %source.display(), "Source file removed");
    Ok(())
}

/// Recursively delete the segmented output directory. Call only after a
/// successful publish.
pub async fn remove_output(output_dir: &Path) -> Result<(), PipelineError> {
    fs::remove_dir_all(output_dir).await.map_err(|e| {
        PipelineError::Cleanup(format!(
            "failed to remove output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    tracing::info!(output_dir = %output_dir.display(), "Output directory removed");
    Ok(())
}
