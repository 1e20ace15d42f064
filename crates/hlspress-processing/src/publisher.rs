//! Publishing of a segmented output directory to object storage.

use crate::classify::{classify_output, ClassifiedFile};
use hlspress_core::{asset, FileClass, PipelineError, MASTER_PLAYLIST};
use hlspress_storage::Storage;
use std::path::Path;
use std::sync::Arc;

/// Uploads every classified output file under `hls/{base_name}/` and
/// reports the public URL of the entry manifest.
pub struct Publisher {
    storage: Arc<dyn Storage>,
}

impl Publisher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Publish `output_dir`. Uploads manifests, then posters, then
    /// fragments; the first failure aborts the remaining uploads. Returns
    /// the entry manifest's public URL, constructed without querying the
    /// backend.
    pub async fn publish(&self, output_dir: &Path) -> Result<String, PipelineError> {
        let base_name = output_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PipelineError::Upload(format!(
                    "output directory {} has no usable base name",
                    output_dir.display()
                ))
            })?;

        let files = classify_output(output_dir).await?;

        // The returned URL points at the entry manifest; refuse to publish
        // an output set that does not contain one.
        if !files
            .iter()
            .any(|f| f.class == FileClass::Manifest && f.name == MASTER_PLAYLIST)
        {
            return Err(PipelineError::Upload(format!(
                "output directory {} does not contain {}",
                output_dir.display(),
                MASTER_PLAYLIST
            )));
        }

        for file in &files {
            self.upload_file(base_name, file).await?;
        }

        let manifest_count = files
            .iter()
            .filter(|f| f.class == FileClass::Manifest)
            .count();
        tracing::info!(
            base_name = %base_name,
            file_count = files.len(),
            manifest_count = manifest_count,
            "Published HLS asset"
        );

        Ok(self
            .storage
            .public_url(&asset::object_key(base_name, MASTER_PLAYLIST)))
    }

    async fn upload_file(&self, base_name: &str, file: &ClassifiedFile) -> Result<(), PipelineError> {
        let data = tokio::fs::read(&file.path).await.map_err(|e| {
            PipelineError::Upload(format!("failed to read {}: {}", file.path.display(), e))
        })?;

        let key = asset::object_key(base_name, &file.name);
        self.storage
            .put_object(&key, data, &file.class.descriptor())
            .await
            .map_err(|e| {
                PipelineError::Upload(format!("{} ({} {})", e, file.class.as_str(), key))
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::mock_storage::MockStorage;
    use tempfile::tempdir;
    use tokio::fs;

    async fn write(path: &Path, data: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, data).await.unwrap();
    }

    async fn fixture_output(dir: &Path) {
        write(&dir.join("index.m3u8"), b"gzipped playlist").await;
        write(&dir.join("seg0.mp4"), b"fragment bytes").await;
        write(&dir.join("poster.jpg"), b"poster bytes").await;
        write(&dir.join("debug.log"), b"not published").await;
    }

    #[tokio::test]
    async fn test_publish_uploads_known_classes_once() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("clip.fmp4");
        fixture_output(&output).await;

        let storage = Arc::new(MockStorage::new());
        let publisher = Publisher::new(storage.clone());

        let url = publisher.publish(&output).await.unwrap();
        assert_eq!(url, storage.public_url("hls/clip.fmp4/index.m3u8"));

        assert_eq!(storage.put_count(), 3);
        assert!(storage.has_object("hls/clip.fmp4/index.m3u8"));
        assert!(storage.has_object("hls/clip.fmp4/seg0.mp4"));
        assert!(storage.has_object("hls/clip.fmp4/poster.jpg"));
        assert!(!storage.has_object("hls/clip.fmp4/debug.log"));
    }

    #[tokio::test]
    async fn test_publish_applies_class_descriptors() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("clip.fmp4");
        fixture_output(&output).await;

        let storage = Arc::new(MockStorage::new());
        Publisher::new(storage.clone())
            .publish(&output)
            .await
            .unwrap();

        let manifest = storage.descriptor_of("hls/clip.fmp4/index.m3u8").unwrap();
        assert_eq!(manifest.content_type, "application/vnd.apple.mpegurl");
        assert_eq!(manifest.content_encoding, Some("gzip"));

        let fragment = storage.descriptor_of("hls/clip.fmp4/seg0.mp4").unwrap();
        assert_eq!(fragment.content_type, "video/mp4");
        assert_eq!(fragment.content_encoding, None);

        let poster = storage.descriptor_of("hls/clip.fmp4/poster.jpg").unwrap();
        assert_eq!(poster.content_type, "image/jpeg");
        assert_eq!(poster.cache_control, "max-age=31536000,public");
    }

    #[tokio::test]
    async fn test_publish_order_is_deterministic() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("clip.fmp4");
        fixture_output(&output).await;
        write(&output.join("seg1.mp4"), b"more").await;

        let storage = Arc::new(MockStorage::new());
        Publisher::new(storage.clone())
            .publish(&output)
            .await
            .unwrap();

        assert_eq!(
            storage.put_order(),
            vec![
                "hls/clip.fmp4/index.m3u8",
                "hls/clip.fmp4/poster.jpg",
                "hls/clip.fmp4/seg0.mp4",
                "hls/clip.fmp4/seg1.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_requires_master_playlist() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("clip.fmp4");
        write(&output.join("media.m3u8"), b"playlist").await;
        write(&output.join("seg0.mp4"), b"fragment").await;

        let storage = Arc::new(MockStorage::new());
        let err = Publisher::new(storage.clone())
            .publish(&output)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
        assert!(err.to_string().contains("index.m3u8"));
        assert_eq!(storage.put_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_aborts_on_first_failure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("clip.fmp4");
        fixture_output(&output).await;

        let storage = Arc::new(MockStorage::new());
        storage.fail_after(1);
        let err = Publisher::new(storage.clone())
            .publish(&output)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
        // Only the first upload went through before the abort
        assert_eq!(storage.put_count(), 1);
    }
}
