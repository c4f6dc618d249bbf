//! Configuration module for the TweetRegistry deployment toolchain.
//!
//! This module holds the compiler settings the contract artifacts are built
//! with, the networks a deployment can target, and the deployment parameters.
//! Configuration is read from a TOML file, `${VAR}` references are resolved
//! from the environment, and the result is validated before use.
//!
//! ## File layout
//!
//! ```toml
//! [solidity]
//! version = "0.8.28"
//!
//! [solidity.settings.optimizer]
//! enabled = true
//! runs = 50
//!
//! [deployment]
//! contract = "TweetRegistry"
//! artifacts_dir = "artifacts"
//!
//! [networks.localhost]
//! url = "http://127.0.0.1:8545"
//! private_key = "${DEPLOYER_PRIVATE_KEY}"
//! ```

pub mod builders;

pub use builders::config::ConfigBuilder;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Well-known values of the local development node.
pub mod defaults {
	/// Solidity compiler version the contracts are built with.
	pub const SOLC_VERSION: &str = "0.8.28";

	/// Optimizer runs, tuned towards smaller contract size.
	pub const OPTIMIZER_RUNS: u32 = 50;

	/// Contract deployed when no other name is configured.
	pub const CONTRACT_NAME: &str = "TweetRegistry";

	/// Directory holding compiled contract artifacts.
	pub const ARTIFACTS_DIR: &str = "artifacts";

	/// Name of the network used when none is selected.
	pub const NETWORK_NAME: &str = "localhost";

	/// JSON-RPC endpoint of a local Hardhat or Anvil node.
	pub const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8545";

	/// Private key of development account #0 on Hardhat and Anvil nodes.
	///
	/// This is a publicly known test key and must never hold real funds.
	pub const DEV_PRIVATE_KEY: &str =
		"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
	/// The requested network is not part of the configuration.
	#[error("Unknown network '{name}' (configured: {available})")]
	UnknownNetwork { name: String, available: String },
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Compiler settings the artifacts are expected to be built with.
	pub solidity: CompilerSettings,
	/// Parameters of the deployment itself.
	#[serde(default)]
	pub deployment: DeploymentConfig,
	/// Deployment targets keyed by network name.
	#[serde(default = "default_networks")]
	pub networks: HashMap<String, NetworkConfig>,
}

/// Solidity compiler version and optimizer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerSettings {
	/// Semantic version of the Solidity compiler, e.g. `0.8.28`.
	pub version: String,
	#[serde(default)]
	pub settings: SolcSettings,
}

/// The `settings` block handed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolcSettings {
	#[serde(default)]
	pub optimizer: OptimizerSettings,
}

/// Optimizer toggle and the number of runs it optimizes for.
///
/// Fewer runs favour smaller bytecode, more runs favour cheaper calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptimizerSettings {
	#[serde(default = "default_true")]
	pub enabled: bool,
	#[serde(default = "default_optimizer_runs")]
	pub runs: u32,
}

impl Default for OptimizerSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			runs: defaults::OPTIMIZER_RUNS,
		}
	}
}

impl Default for CompilerSettings {
	fn default() -> Self {
		Self {
			version: defaults::SOLC_VERSION.to_string(),
			settings: SolcSettings::default(),
		}
	}
}

impl CompilerSettings {
	pub fn optimizer_enabled(&self) -> bool {
		self.settings.optimizer.enabled
	}

	pub fn optimizer_runs(&self) -> u32 {
		self.settings.optimizer.runs
	}
}

/// Parameters of the deployment run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
	/// Name of the contract artifact to deploy.
	#[serde(default = "default_contract")]
	pub contract: String,
	/// Directory containing the compiled artifacts.
	#[serde(default = "default_artifacts_dir")]
	pub artifacts_dir: PathBuf,
	/// Confirmations to wait for before the deployment counts as done.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Network used when none is selected on the command line.
	#[serde(default = "default_network_name")]
	pub default_network: String,
}

impl Default for DeploymentConfig {
	fn default() -> Self {
		Self {
			contract: default_contract(),
			artifacts_dir: default_artifacts_dir(),
			confirmations: default_confirmations(),
			default_network: default_network_name(),
		}
	}
}

/// A JSON-RPC endpoint and the key that signs the deployment on it.
#[derive(Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP JSON-RPC endpoint.
	pub url: String,
	/// Hex-encoded private key of the deploying account.
	#[serde(default)]
	pub private_key: Option<String>,
	/// Expected chain id. The node is checked against it before deploying.
	#[serde(default)]
	pub chain_id: Option<u64>,
}

impl std::fmt::Debug for NetworkConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NetworkConfig")
			.field("url", &self.url)
			.field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
			.field("chain_id", &self.chain_id)
			.finish()
	}
}

impl NetworkConfig {
	/// The local development node signed with development account #0.
	pub fn localhost() -> Self {
		Self {
			url: defaults::LOCALHOST_RPC_URL.to_string(),
			private_key: Some(defaults::DEV_PRIVATE_KEY.to_string()),
			chain_id: None,
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_optimizer_runs() -> u32 {
	defaults::OPTIMIZER_RUNS
}

fn default_contract() -> String {
	defaults::CONTRACT_NAME.to_string()
}

fn default_artifacts_dir() -> PathBuf {
	PathBuf::from(defaults::ARTIFACTS_DIR)
}

fn default_confirmations() -> u64 {
	1
}

fn default_network_name() -> String {
	defaults::NETWORK_NAME.to_string()
}

fn default_networks() -> HashMap<String, NetworkConfig> {
	HashMap::from([(defaults::NETWORK_NAME.to_string(), NetworkConfig::localhost())])
}

impl Default for Config {
	fn default() -> Self {
		Self {
			solidity: CompilerSettings::default(),
			deployment: DeploymentConfig::default(),
			networks: default_networks(),
		}
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}, used when the
/// variable is unset or empty.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut resolved = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match (std::env::var(var_name.as_str()), cap.get(2)) {
			(Ok(v), Some(default)) if v.is_empty() => default.as_str().to_string(),
			(Ok(v), _) => v,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					var_name.as_str()
				)))
			},
		};

		resolved.push_str(&input[last..full_match.start()]);
		resolved.push_str(&value);
		last = full_match.end();
	}
	resolved.push_str(&input[last..]);

	Ok(resolved)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables referenced in the file are resolved before
	/// parsing, and the parsed configuration is validated.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Looks up a network to deploy to by name.
	///
	/// Only the selected network needs a url, so it is checked here rather
	/// than at load time.
	pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
		let network = self
			.networks
			.get(name)
			.ok_or_else(|| ConfigError::UnknownNetwork {
				name: name.to_string(),
				available: self.network_names().join(", "),
			})?;
		if network.url.trim().is_empty() {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' has an empty url"
			)));
		}
		Ok(network)
	}

	/// Sorted names of all configured networks.
	pub fn network_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.networks.keys().cloned().collect();
		names.sort();
		names
	}

	/// Validates the configuration.
	///
	/// - Compiler version is a `MAJOR.MINOR.PATCH` triple
	/// - Optimizer runs and confirmations are positive
	/// - At least one network is configured
	/// - The contract name and default network are set and resolvable
	fn validate(&self) -> Result<(), ConfigError> {
		let version_re = Regex::new(r"^\d+\.\d+\.\d+$")
			.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;
		if !version_re.is_match(&self.solidity.version) {
			return Err(ConfigError::Validation(format!(
				"Invalid compiler version '{}': expected MAJOR.MINOR.PATCH",
				self.solidity.version
			)));
		}

		if self.solidity.optimizer_runs() == 0 {
			return Err(ConfigError::Validation(
				"Optimizer runs must be a positive integer".into(),
			));
		}

		if self.deployment.confirmations == 0 {
			return Err(ConfigError::Validation(
				"Deployment confirmations must be a positive integer".into(),
			));
		}

		if self.deployment.contract.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Deployment contract name cannot be empty".into(),
			));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}

		if !self.networks.contains_key(&self.deployment.default_network) {
			return Err(ConfigError::Validation(format!(
				"Default network '{}' is not configured",
				self.deployment.default_network
			)));
		}

		Ok(())
	}
}

/// Parses a TOML string, resolving environment variables and validating
/// the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
