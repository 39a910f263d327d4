//! tunedeck-ui - Menu-driven collection manager
//!
//! Talks to the four song services over their fixed addresses and keeps
//! accounts and per-user liked songs under the data root.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tunedeck_common::client::ServiceClient;
use tunedeck_common::config;
use tunedeck_common::dataset::Dataset;
use tunedeck_ui::screens::{ServiceEndpoints, Ui};
use tunedeck_ui::store::AccountStore;

#[derive(Parser, Debug)]
#[command(name = "tunedeck-ui", about = "Menu-driven song collection manager")]
struct Args {
    /// Data root folder for accounts and liked-song files
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Local song dataset used to fill in details when adding songs
    #[arg(long, env = "TUNEDECK_DATASET", default_value = "spotify_data.csv")]
    dataset: PathBuf,

    /// Recommendation service address
    #[arg(long, env = "TUNEDECK_RECOMMEND_ADDR", default_value = config::RECOMMEND_ADDR)]
    recommend_addr: String,

    /// Random-song service address
    #[arg(long, env = "TUNEDECK_RANDOM_ADDR", default_value = config::RANDOM_ADDR)]
    random_addr: String,

    /// Song-by-year service address
    #[arg(long, env = "TUNEDECK_YEAR_ADDR", default_value = config::SONG_BY_YEAR_ADDR)]
    year_addr: String,

    /// Total-duration service address
    #[arg(long, env = "TUNEDECK_DURATION_ADDR", default_value = config::TOTAL_DURATION_ADDR)]
    duration_addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let root = config::resolve_root_folder(args.root_folder.as_deref());
    info!(root = %root.display(), "using data root");

    // The dataset is optional here: without it, added songs just get
    // "Unknown" details instead of dataset-backed ones.
    let dataset = match Dataset::load_csv(&args.dataset) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            warn!(path = %args.dataset.display(), error = %e, "dataset unavailable");
            None
        }
    };

    let accounts = AccountStore::load(&root)?;
    let services = ServiceEndpoints {
        recommend: ServiceClient::new(args.recommend_addr),
        random: ServiceClient::new(args.random_addr),
        song_by_year: ServiceClient::new(args.year_addr),
        total_duration: ServiceClient::new(args.duration_addr),
    };

    let mut ui = Ui::new(io::stdin().lock(), root, accounts, services, dataset);
    ui.run().await?;
    Ok(())
}
