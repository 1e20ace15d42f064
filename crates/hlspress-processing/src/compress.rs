//! In-place gzip compression of playlist manifests.
//!
//! Every `.m3u8` under the output directory is rewritten as gzip bytes
//! under its original name, so delivery can serve a stable URL with
//! `Content-Encoding: gzip`. The rewrite goes through a `.gz` sibling and
//! a rename, never a partial in-place write.

use crate::classify::walk_files;
use flate2::write::GzEncoder;
use flate2::Compression;
use hlspress_core::PipelineError;
use std::io::Write;
use std::path::Path;
use tokio::fs;

/// Leading bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Gzip every playlist manifest under `output_dir` in place, preserving
/// file names. Returns the number of manifests rewritten.
///
/// This is a single-pass operation: a manifest that is already
/// gzip-encoded is an error, since re-encoding would corrupt it.
pub async fn compress_manifests(output_dir: &Path) -> Result<usize, PipelineError> {
    let paths = walk_files(output_dir).await.map_err(|e| {
        PipelineError::Compression(format!(
            "failed to scan output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut count = 0usize;
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("m3u8") {
            continue;
        }

        let data = fs::read(&path).await.map_err(|e| {
            PipelineError::Compression(format!("failed to read {}: {}", path.display(), e))
        })?;

        if data.starts_with(&GZIP_MAGIC) {
            return Err(PipelineError::Compression(format!(
                "{} is already gzip-encoded; refusing to double-encode",
                path.display()
            )));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).map_err(|e| {
            PipelineError::Compression(format!("failed to encode {}: {}", path.display(), e))
        })?;
        let compressed = encoder.finish().map_err(|e| {
            PipelineError::Compression(format!("failed to encode {}: {}", path.display(), e))
        })?;

        let tmp = path.with_extension("m3u8.gz");
        fs::write(&tmp, &compressed).await.map_err(|e| {
            PipelineError::Compression(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            PipelineError::Compression(format!(
                "failed to replace {} with compressed content: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %path.display(),
            original_bytes = data.len(),
            compressed_bytes = compressed.len(),
            "Manifest compressed"
        );
        count += 1;
    }

    tracing::info!(
        output_dir = %output_dir.display(),
        manifest_count = count,
        "Compressed playlist manifests"
    );

    Ok(count)
}
