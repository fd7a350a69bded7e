use anyhow::Context;
use clap::Parser;
use tracing::debug;

use pricing_cli::app;
use pricing_cli::cli::Cli;
use pricing_cli::config::AppConfig;
use pricing_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = cli.apply_overrides(config);
    logging::init_logging(&config.logging)?;

    debug!(
        backend = %config.storage.backend,
        location = %config.storage.location,
        "configuration loaded"
    );

    let output = app::run(&cli.command, &config).await?;
    print!("{output}");

    Ok(())
}
