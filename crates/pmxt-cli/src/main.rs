/*
[INPUT]:  CLI arguments, YAML configuration file, environment variables
[OUTPUT]: Market data, quotes and account state printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pmxt_cli::{Cli, CliConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = load_config(&args.config_path)?;
    info!(
        config_path = %args.config_path.display(),
        venue = %args.venue,
        base_url = %config.sidecar.base_url,
        "configuration loaded"
    );

    pmxt_cli::run(args, config).await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let mut config = CliConfig::from_file(path).context("load config")?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}
