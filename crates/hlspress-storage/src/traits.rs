//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The publisher depends only on this trait, never on a concrete
//! backend.

use async_trait::async_trait;
use hlspress_core::{StorageBackend, UploadDescriptor};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Keys follow the publishing layout `hls/{base_name}/{filename}` and must
/// not contain `..` or a leading `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an object under `key` with the metadata in `descriptor`.
    /// Returns the public URL of the uploaded object.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        descriptor: &UploadDescriptor,
    ) -> StorageResult<String>;

    /// Public URL for `key`, built from backend configuration alone.
    /// Never queries the backend.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
