use anyhow::{Context, anyhow};
use clap::Parser;
use std::sync::Arc;

use ecom::dataset::Dataset;
use processing::executable_utils::{CommonArgs, build_engine, initialize_executable};

/// Re-scores the orders of a trailing window and prints fraud statistics as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Window length in days; defaults to `statistics.default_window_days`
    #[arg(short, long)]
    window_days: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = initialize_executable(&args.common, |c| c.statistics.log_level.as_str())
        .map_err(|e| anyhow!(e))?;

    let dataset = Dataset::load_optional(args.common.dataset_path(&config).as_deref())?;
    let engine = build_engine(&config, Arc::new(dataset.into_storage()));

    let statistics = match args.window_days {
        Some(days) => engine.get_statistics(days).await,
        None => engine.get_default_statistics().await,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&statistics).context("Failed to serialize statistics")?
    );
    Ok(())
}
