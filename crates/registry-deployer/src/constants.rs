//! Constants used by the command-line entry point

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "registry.toml";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "registry_deployer=info,warn";

/// Environment variable names
pub mod env_vars {
	pub const CONFIG_PATH: &str = "REGISTRY_CONFIG";
	pub const NETWORK: &str = "REGISTRY_NETWORK";
}
