//! hlspress: convert a video file into a published HLS asset.
//!
//! Configure storage and the segmenter through the environment (or a local
//! `.env` file), then run `hlspress path/to/clip.mp4`. On success the
//! public URL of the entry manifest is printed to stdout.
//!
//! Exit codes: 0 success, 1 usage/configuration error, 2 corrupt input,
//! 3 segmentation failure, 4 publish failure, 5 compression failure,
//! 6 cleanup failure.

use clap::Parser;
use hlspress_cli::init_tracing;
use hlspress_core::{Config, PipelineError};
use hlspress_processing::{CommandSegmenter, Pipeline};
use hlspress_storage::create_storage;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hlspress", about = "Convert a video into a published HLS asset")]
struct Cli {
    /// Path to the source video file
    source: PathBuf,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let is_help = matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            );
            let _ = e.print();
            process::exit(if is_help { 0 } else { 1 });
        }
    };

    process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hlspress: {:#}", e);
            return 1;
        }
    };

    let storage = match create_storage(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("hlspress: {}", e);
            return 1;
        }
    };

    let segmenter = Arc::new(CommandSegmenter::from_config(&config));
    let pipeline = Pipeline::new(segmenter, storage);

    match pipeline.run(&cli.source).await {
        Ok(report) => {
            println!("{}", report.playlist_url);
            0
        }
        Err(PipelineError::InvalidInput(e)) => {
            tracing::debug!(error = %e, "Integrity check failed");
            eprintln!("Corrupt MP4");
            PipelineError::InvalidInput(e).exit_code()
        }
        Err(e) => {
            eprintln!("hlspress: {}", e);
            e.exit_code()
        }
    }
}
