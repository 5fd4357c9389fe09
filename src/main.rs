use clap::Parser;
use ocif_staker::cli::{commands, Cli, Commands};
use ocif_staker::config::AppConfig;
use tracing::error;

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;

    match &cli.command {
        Commands::Plan { .. } | Commands::Unbonding | Commands::Metrics => init_logging_simple(),
        _ => init_logging(&config.logging),
    }

    if let Err(e) = commands::run(&cli, &config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
