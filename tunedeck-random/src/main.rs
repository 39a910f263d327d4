//! tunedeck-random - Random-song endpoint
//!
//! Binds one address (default port 5556) and returns one uniformly random
//! dataset row per request.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tunedeck_common::dataset::Dataset;
use tunedeck_common::{config, endpoint};
use tunedeck_random::RandomSongService;

#[derive(Parser, Debug)]
#[command(name = "tunedeck-random", about = "Random song endpoint")]
struct Args {
    /// CSV dataset path
    #[arg(long, env = "TUNEDECK_DATASET", default_value = "spotify_data.csv")]
    dataset: PathBuf,

    /// Bind address
    #[arg(long, env = "TUNEDECK_RANDOM_ADDR", default_value = config::RANDOM_ADDR)]
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
        "Starting Tunedeck random-song service v{}",
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
    endpoint::serve(listener, RandomSongService::new(dataset)).await?;
    Ok(())
}
