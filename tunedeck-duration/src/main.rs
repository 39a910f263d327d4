//! tunedeck-duration - Total-duration endpoint
//!
//! Binds one address (default port 5558) and returns the total listening
//! time of a user's liked songs.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tunedeck_common::{config, endpoint};
use tunedeck_duration::TotalDurationService;

#[derive(Parser, Debug)]
#[command(name = "tunedeck-duration", about = "Total playlist duration endpoint")]
struct Args {
    /// Data root folder holding per-user liked-song files
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "TUNEDECK_DURATION_ADDR", default_value = config::TOTAL_DURATION_ADDR)]
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
        "Starting Tunedeck total-duration service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let root = config::resolve_root_folder(args.root_folder.as_deref());
    info!(root = %root.display(), "using data root");

    let listener = endpoint::bind(&args.bind).await?;
    endpoint::serve(listener, TotalDurationService::new(root)).await?;
    Ok(())
}
