//! Offline batch scorer CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "storecast-batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline batch sales scoring against a persisted model artifact", long_about = None)]
struct Args {
    /// Day-level input CSV (one row per store per day)
    #[arg(long)]
    days: PathBuf,

    /// Store attribute CSV joined on the store identifier
    #[arg(long)]
    stores: PathBuf,

    /// Model artifact path
    #[arg(short, long, default_value = "models/active.json")]
    model: PathBuf,

    /// Output CSV of (Id, Sales) pairs
    #[arg(short, long, default_value = "predictions.csv")]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("storecast batch scorer v{}", env!("CARGO_PKG_VERSION"));

    let summary = storecast_batch::run(&args.days, &args.stores, &args.model, &args.output)?;

    info!(
        "scored {} of {} rows -> {}",
        summary.scored,
        summary.rows,
        args.output.display()
    );
    Ok(())
}
