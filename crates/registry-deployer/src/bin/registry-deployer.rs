//! Binary entry point for the TweetRegistry deployer
//!
//! Loads the configuration, deploys the contract once and turns the outcome
//! into the process exit status.

use anyhow::{Context, Result};
use clap::Parser;
use registry_deployer::{
	cli::Cli, constants::DEFAULT_LOG_FILTER, core::logging, exit_status, AlloyDeployer,
	ArtifactStore, DeploymentDriver, DeploymentResult, TerminalReporter,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	init_logging();

	let cli = Cli::parse();
	let result = run(cli).await;

	if let Err(err) = &result {
		logging::operation_error("Deployment", err);
	}
	ExitCode::from(exit_status(&result))
}

/// Initialize structured logging on stderr
///
/// Stdout carries only the deployment result lines. Logs are controlled via
/// the RUST_LOG environment variable.
fn init_logging() {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

async fn run(cli: Cli) -> Result<DeploymentResult> {
	let config = cli.load_config().await.context("Failed to load configuration")?;
	let network_name = cli.network_name(&config);
	let network = config.network(network_name)?;

	info!(
		network = network_name,
		url = %network.url,
		solc = %config.solidity.version,
		optimizer_runs = config.solidity.optimizer_runs(),
		"Preparing deployment"
	);

	let artifacts = ArtifactStore::new(&config.deployment.artifacts_dir);
	info!(artifacts = %artifacts.root().display(), contract = %config.deployment.contract, "Resolving artifact");

	let deployer = AlloyDeployer::new(
		network,
		artifacts,
		config.solidity.clone(),
		config.deployment.confirmations,
	)?;
	info!(deployer = %deployer.deployer_address(), "Deployer account loaded");

	let driver = DeploymentDriver::new(Arc::new(deployer), config.deployment.contract.clone());
	let result = driver.run(&TerminalReporter).await?;
	Ok(result)
}
