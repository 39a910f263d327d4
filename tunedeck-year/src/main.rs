//! tunedeck-year - Song-by-year endpoint
//!
//! Binds one address (default port 5557) and returns one uniformly random
//! song from the requested release year.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tunedeck_common::dataset::Dataset;
use tunedeck_common::{config, endpoint};
use tunedeck_year::SongByYearService;

#[derive(Parser, Debug)]
#[command(name = "tunedeck-year", about = "Song-by-year endpoint")]
struct Args {
    /// CSV dataset path
    #[arg(long, env = "TUNEDECK_DATASET", default_value = "spotify_data.csv")]
    dataset: PathBuf,

    /// Bind address
    #[arg(long, env = "TUNEDECK_YEAR_ADDR", default_value = config::SONG_BY_YEAR_ADDR)]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Tunedeck song-by-year service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let dataset = match Dataset::load_csv(&args.dataset) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load dataset: {e}");
            return Err(e.into());
        }
    };

    let listener = endpoint::bind(&args.bind).await?;
    endpoint::serve(listener, SongByYearService::new(dataset)).await?;
    Ok(())
}
