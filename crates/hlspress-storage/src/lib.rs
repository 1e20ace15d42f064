//! Storage abstraction and backends for published HLS assets.
//!
//! The `Storage` trait is the seam between the pipeline and object storage:
//! the publisher only ever calls `put_object` and `public_url`, so test
//! suites can substitute an in-memory double. The S3 backend applies the
//! per-object metadata (content type, cache policy, encoding, ACL) that
//! public HLS delivery depends on; the local backend exists for development
//! and integration tests.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use hlspress_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
