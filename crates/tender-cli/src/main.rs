//! `tender`: command-line client for the tender lifecycle engine.
//!
//! Loads the configuration (path from `--config` or `TENDER_CONFIG`, with
//! `.env` applied first), connects to the configured network and runs one
//! command.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::output::{Display, Output};
use cli::Cli;
use tender_config::Config;
use tender_core::{EngineError, TenderEngine};
use tracing_subscriber::EnvFilter;

/// Sets up the tracing subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(true)
				.with_writer(std::io::stderr)
				.compact(),
		)
		.with(env_filter)
		.init();
}

async fn run(cli: Cli) -> Result<()> {
	let config = Config::from_file(&cli.config)
		.await
		.with_context(|| format!("Failed to load configuration from {}", cli.config))?;
	tracing::debug!(network_id = config.engine.network_id, "Loaded configuration");

	let engine = TenderEngine::from_config(&config)?;
	commands::run(&engine, cli.command, Output::new(cli.json)).await
}

#[tokio::main]
async fn main() {
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	init_logging(&cli.log_level);

	if let Err(e) = run(cli).await {
		Display::error(&format!("{e:#}"));
		if e
			.downcast_ref::<EngineError>()
			.is_some_and(EngineError::is_retryable)
		{
			Display::info("This is a read failure and may be retried");
		}
		std::process::exit(1);
	}
}
