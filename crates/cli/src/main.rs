//! gallery-scraper entry point.
//!
//! Loads configuration, routes diagnostics to the log file and runs the
//! selected operation mode. A rate limit ends the process with a non-zero
//! exit status.

use anyhow::{Context, Result};
use clap::Parser;

use gallery_core::AppConfig;

mod cli;
mod logging;
mod tasks;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let mut config = AppConfig::load_from(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);
    config.validate()?;
    let command = args.command(&config);

    logging::clean_start(&config, command.task())?;

    logging::init(&config.log_file)?;
    tracing::info!(task = ?command.task(), "starting gallery-scraper");

    if let Err(e) = tasks::run(&command, &config, !args.no_progress).await {
        tracing::error!(error = %e, "task failed");
        return Err(e.into());
    }

    tracing::info!("done");
    Ok(())
}
