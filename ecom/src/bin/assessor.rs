use anyhow::{Context, anyhow};
use clap::Parser;
use std::sync::Arc;

use ecom::dataset::{Dataset, load_order};
use processing::executable_utils::{CommonArgs, build_engine, initialize_executable};

/// Scores a single order and prints the assessment as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Order to assess (JSON order candidate or stored order record)
    #[arg(short, long)]
    order: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = initialize_executable(&args.common, |c| c.assessor.log_level.as_str())
        .map_err(|e| anyhow!(e))?;

    let dataset = Dataset::load_optional(args.common.dataset_path(&config).as_deref())?;
    let engine = build_engine(&config, Arc::new(dataset.into_storage()));

    let order = load_order(&args.order)?;
    let assessment = engine.assess(&order).await;

    tracing::info!(
        customer_id = %order.customer_id,
        order_id = ?order.order_id,
        score = assessment.score,
        level = %assessment.level,
        "Assessment finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&assessment).context("Failed to serialize assessment")?
    );
    Ok(())
}
