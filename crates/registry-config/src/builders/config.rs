//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{
	defaults, CompilerSettings, Config, DeploymentConfig, NetworkConfig, OptimizerSettings,
	SolcSettings,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Builder for creating `Config` instances with a fluent API.
///
/// Starts from the built-in defaults: solc 0.8.28 with 50 optimizer runs,
/// the `TweetRegistry` contract and a single `localhost` network.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	version: String,
	optimizer_enabled: bool,
	optimizer_runs: u32,
	contract: String,
	artifacts_dir: PathBuf,
	confirmations: u64,
	default_network: String,
	networks: HashMap<String, NetworkConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values.
	pub fn new() -> Self {
		Self {
			version: defaults::SOLC_VERSION.to_string(),
			optimizer_enabled: true,
			optimizer_runs: defaults::OPTIMIZER_RUNS,
			contract: defaults::CONTRACT_NAME.to_string(),
			artifacts_dir: PathBuf::from(defaults::ARTIFACTS_DIR),
			confirmations: 1,
			default_network: defaults::NETWORK_NAME.to_string(),
			networks: HashMap::from([(
				defaults::NETWORK_NAME.to_string(),
				NetworkConfig::localhost(),
			)]),
		}
	}

	/// Sets the compiler version.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = version.into();
		self
	}

	/// Sets the optimizer toggle and runs.
	pub fn optimizer(mut self, enabled: bool, runs: u32) -> Self {
		self.optimizer_enabled = enabled;
		self.optimizer_runs = runs;
		self
	}

	/// Sets the contract to deploy.
	pub fn contract(mut self, contract: impl Into<String>) -> Self {
		self.contract = contract.into();
		self
	}

	/// Sets the artifacts directory.
	pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.artifacts_dir = dir.into();
		self
	}

	/// Sets the number of confirmations to wait for.
	pub fn confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	/// Adds or replaces a network and makes it the default.
	pub fn network(mut self, name: impl Into<String>, network: NetworkConfig) -> Self {
		let name = name.into();
		self.networks.insert(name.clone(), network);
		self.default_network = name;
		self
	}

	/// Builds the `Config` without validating it.
	pub fn build(self) -> Config {
		Config {
			solidity: CompilerSettings {
				version: self.version,
				settings: SolcSettings {
					optimizer: OptimizerSettings {
						enabled: self.optimizer_enabled,
						runs: self.optimizer_runs,
					},
				},
			},
			deployment: DeploymentConfig {
				contract: self.contract,
				artifacts_dir: self.artifacts_dir,
				confirmations: self.confirmations,
				default_network: self.default_network,
			},
			networks: self.networks,
		}
	}
}
