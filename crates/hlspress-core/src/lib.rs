//! Core types for the hlspress pipeline: configuration, error taxonomy,
//! and the file-class / upload-descriptor model shared by the processing
//! and storage crates.

pub mod asset;
pub mod config;
pub mod error;
pub mod storage_types;

pub use asset::{FileClass, UploadDescriptor, CACHE_FOREVER, MASTER_PLAYLIST};
pub use config::Config;
pub use error::PipelineError;
pub use storage_types::StorageBackend;
