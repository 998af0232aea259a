use clap::Args;
use common::config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::{
    model::GenericError,
    processor::RiskEngine,
    storage::{OrderStore, ProductStore, UserStore},
};

pub const DEFAULT_CONFIG_PATH: &str = "target/debug/config/total_config.yaml";

/// Arguments shared by every executable.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Dataset to seed the stores with; overrides `common.dataset_path`
    #[arg(short, long)]
    pub dataset: Option<String>,
}

impl CommonArgs {
    pub fn dataset_path(&self, config: &Config) -> Option<String> {
        self.dataset
            .clone()
            .or_else(|| config.common.dataset_path.clone())
    }
}

/// Loads `.env` and the config, then installs the tracing subscriber.
///
/// `RUST_LOG` wins over the level picked from the config.
pub fn initialize_executable<F>(args: &CommonArgs, log_level: F) -> Result<Config, GenericError>
where
    F: Fn(&Config) -> &str,
{
    dotenvy::dotenv().ok();

    let config = Config::load(&args.config)
        .map_err(|e| format!("Failed to load config from {}: {}", args.config, e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level(&config)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()?;

    tracing::info!(
        project = %config.common.project_name,
        config_path = %args.config,
        "Configuration loaded"
    );
    Ok(config)
}

pub fn build_engine<S>(config: &Config, storage: Arc<S>) -> RiskEngine
where
    S: OrderStore + UserStore + ProductStore + 'static,
{
    RiskEngine::new(
        config.assessor.clone(),
        config.statistics.clone(),
        storage.clone(),
        storage.clone(),
        storage,
    )
}
