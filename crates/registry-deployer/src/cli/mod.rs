//! Command-line interface
//!
//! The deployer runs with no arguments. The optional flags select a
//! configuration file and a network, the way `--network` does for a
//! Hardhat script.

pub mod output;

use crate::constants::{env_vars, DEFAULT_CONFIG_PATH};
use clap::Parser;
use registry_config::{Config, ConfigError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Deploy the TweetRegistry contract and print its address
#[derive(Parser, Debug)]
#[command(name = "registry-deployer")]
#[command(about = "Deploy the TweetRegistry contract and print its address", long_about = None)]
#[command(version)]
pub struct Cli {
	/// Path to the configuration file (defaults to registry.toml when present)
	#[arg(short, long, env = env_vars::CONFIG_PATH)]
	pub config: Option<PathBuf>,

	/// Network to deploy to (defaults to deployment.default_network)
	#[arg(short, long, env = env_vars::NETWORK)]
	pub network: Option<String>,
}

impl Cli {
	/// Loads the configuration selected on the command line
	pub async fn load_config(&self) -> Result<Config, ConfigError> {
		load_config_from(self.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH)).await
	}

	/// Network selected on the command line, or the configured default
	pub fn network_name<'a>(&'a self, config: &'a Config) -> &'a str {
		self.network
			.as_deref()
			.unwrap_or(&config.deployment.default_network)
	}
}

/// Loads an explicitly requested file, which must exist, or else the
/// default file when it exists, or else the built-in defaults
pub async fn load_config_from(
	explicit: Option<&Path>,
	default_path: &Path,
) -> Result<Config, ConfigError> {
	if let Some(path) = explicit {
		info!(config_path = %path.display(), "Loading configuration");
		return Config::from_file(path).await;
	}

	if default_path.exists() {
		info!(config_path = %default_path.display(), "Loading configuration");
		return Config::from_file(default_path).await;
	}

	info!("No configuration file found, using built-in defaults");
	Ok(Config::default())
}
