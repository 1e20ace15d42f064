//! Conversion pipeline: verify a source video, segment it into an HLS
//! directory via the external segmenter, gzip the playlist manifests in
//! place, publish everything to object storage, and clean up local
//! artifacts.
//!
//! Each step is its own module so it can be tested in isolation; the
//! `pipeline` module sequences them and owns the cleanup guarantees.

pub mod classify;
pub mod cleaner;
pub mod compress;
pub mod integrity;
pub mod pipeline;
pub mod publisher;
pub mod segmenter;
pub mod test_helpers;

pub use classify::{classify_output, ClassifiedFile};
pub use pipeline::{Pipeline, PipelineReport, PipelineStage};
pub use publisher::Publisher;
pub use segmenter::{CommandSegmenter, Segmenter};
