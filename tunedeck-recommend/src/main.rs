//! tunedeck-recommend - Recommendation endpoint
//!
//! Binds one address (default port 5555) and answers recommend_by_artist,
//! recommend_by_genre, and recommend_popular requests, one at a time.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tunedeck_common::dataset::Dataset;
use tunedeck_common::{config, endpoint};
use tunedeck_recommend::genre_index::GenreIndex;
use tunedeck_recommend::RecommendService;

#[derive(Parser, Debug)]
#[command(name = "tunedeck-recommend", about = "Song recommendation endpoint")]
struct Args {
    /// CSV dataset path
    #[arg(long, env = "TUNEDECK_DATASET", default_value = "spotify_data.csv")]
    dataset: PathBuf,

    /// Bind address
    #[arg(long, env = "TUNEDECK_RECOMMEND_ADDR", default_value = config::RECOMMEND_ADDR)]
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
        "Starting Tunedeck recommendation service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    // Dataset load is the one fatal startup condition.
    let dataset = match Dataset::load_csv(&args.dataset) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load dataset: {e}");
            return Err(e.into());
        }
    };
    let genres = GenreIndex::build(&dataset).await?;

    let listener = endpoint::bind(&args.bind).await?;
    endpoint::serve(listener, RecommendService::new(dataset, genres)).await?;
    Ok(())
}
