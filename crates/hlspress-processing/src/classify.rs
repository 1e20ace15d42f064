//! Classification of segmenter output files.
//!
//! Scans the output directory recursively and pairs every known file with
//! its class. Classification is separate from upload so the file set and
//! its ordering can be asserted without a storage backend.

use hlspress_core::{FileClass, PipelineError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A segmenter output file with its resolved class.
///
/// `name` is the bare file name; published keys are flat under the output
/// directory's base name regardless of any nesting on disk.
#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub name: String,
    pub class: FileClass,
}

/// Recursively collect every regular file under `dir`.
pub(crate) async fn walk_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Classify every file under `output_dir`.
///
/// Files with unknown extensions are skipped. The result is ordered
/// manifests first, then posters, then fragments, sorted by name within
/// each class, so upload order is deterministic.
pub async fn classify_output(output_dir: &Path) -> Result<Vec<ClassifiedFile>, PipelineError> {
    let paths = walk_files(output_dir).await.map_err(|e| {
        PipelineError::Upload(format!(
            "failed to scan output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut classified = Vec::new();
    for path in paths {
        let Some(class) = FileClass::from_path(&path) else {
            tracing::debug!(path = %path.display(), "Skipping file of unknown class");
            continue;
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| {
                PipelineError::Upload(format!("invalid file name: {}", path.display()))
            })?;
        classified.push(ClassifiedFile { path, name, class });
    }

    classified.sort_by(|a, b| a.class.cmp(&b.class).then_with(|| a.name.cmp(&b.name)));

    Ok(classified)
}
