//! Compiled contract artifacts
//!
//! Locates the JSON artifacts produced by `hardhat compile` or `forge build`
//! and extracts the creation bytecode. Both layouts keep one directory per
//! source file (`<Source>.sol/<Contract>.json`); Hardhat nests them under
//! `contracts/`, Foundry puts them directly under `out/`.
//!
//! Foundry embeds the compiler settings in the artifact itself. Hardhat
//! writes a `<Contract>.dbg.json` next to the artifact that points at the
//! `build-info/*.json` file holding them.

use crate::types::error::{DeployError, Result};
use alloy_primitives::{hex, Bytes};
use registry_config::CompilerSettings;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compiler settings recorded in an artifact's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCompiler {
	/// Full compiler version, e.g. `0.8.28+commit.7893614a`
	pub version: String,
	pub optimizer_enabled: bool,
	pub optimizer_runs: u64,
}

impl ArtifactCompiler {
	/// Reads the compiler settings from a Hardhat build-info document
	pub fn from_build_info(build_info: &Value) -> Option<Self> {
		let version = build_info
			.get("solcLongVersion")
			.or_else(|| build_info.get("solcVersion"))?
			.as_str()?
			.to_string();
		let optimizer = build_info.pointer("/input/settings/optimizer")?;

		Some(Self {
			version,
			optimizer_enabled: optimizer.get("enabled")?.as_bool()?,
			optimizer_runs: optimizer.get("runs")?.as_u64()?,
		})
	}

	/// Compiler version without the `+commit...` build suffix
	pub fn semver(&self) -> &str {
		let version = self.version.trim_start_matches('v');
		version.split('+').next().unwrap_or(version)
	}
}

/// A compiled contract ready to be deployed
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	pub contract_name: String,
	pub bytecode: Bytes,
	pub compiler: Option<ArtifactCompiler>,
}

impl ContractArtifact {
	/// Parses an artifact from its JSON representation
	///
	/// Accepts the Hardhat shape (`"bytecode": "0x..."`) and the Foundry
	/// shape (`"bytecode": {"object": "0x..."}`). Compiler metadata is read
	/// when the artifact carries it, otherwise `compiler` is `None`.
	pub fn from_json(contract_name: &str, json: &Value) -> Result<Self> {
		let bytecode_hex = match json.get("bytecode") {
			Some(Value::String(s)) => s.as_str(),
			Some(obj) => obj.get("object").and_then(Value::as_str).ok_or_else(|| {
				DeployError::InvalidArtifact(format!("{contract_name}: bytecode.object missing"))
			})?,
			None => {
				return Err(DeployError::InvalidArtifact(format!(
					"{contract_name}: no bytecode found in artifact"
				)))
			},
		};

		let hex_str = bytecode_hex.strip_prefix("0x").unwrap_or(bytecode_hex);
		if hex_str.is_empty() {
			return Err(DeployError::InvalidArtifact(format!(
				"{contract_name}: empty bytecode, the contract is abstract or an interface"
			)));
		}
		if hex_str.contains("__$") {
			return Err(DeployError::InvalidArtifact(format!(
				"{contract_name}: bytecode has unlinked library placeholders"
			)));
		}

		let bytecode = hex::decode(hex_str)
			.map(Bytes::from)
			.map_err(|e| DeployError::InvalidArtifact(format!("{contract_name}: {e}")))?;

		Ok(Self {
			contract_name: contract_name.to_string(),
			bytecode,
			compiler: Self::compiler_from_metadata(json),
		})
	}

	fn compiler_from_metadata(json: &Value) -> Option<ArtifactCompiler> {
		let metadata = match json.get("metadata")? {
			// solc emits metadata as an embedded JSON document
			Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
			other => other.clone(),
		};

		let version = metadata.pointer("/compiler/version")?.as_str()?.to_string();
		let optimizer = metadata.pointer("/settings/optimizer")?;

		Some(ArtifactCompiler {
			version,
			optimizer_enabled: optimizer.get("enabled")?.as_bool()?,
			optimizer_runs: optimizer.get("runs")?.as_u64()?,
		})
	}

	/// Checks that the artifact was built with the configured settings
	///
	/// Artifacts without compiler metadata pass unchecked.
	pub fn verify_compiler(&self, settings: &CompilerSettings) -> Result<()> {
		let Some(compiler) = &self.compiler else {
			debug!(contract = %self.contract_name, "Artifact has no compiler metadata");
			return Ok(());
		};

		if compiler.semver() != settings.version {
			return Err(DeployError::CompilerMismatch {
				field: "solc version",
				expected: settings.version.clone(),
				found: compiler.version.clone(),
			});
		}
		if compiler.optimizer_enabled != settings.optimizer_enabled() {
			return Err(DeployError::CompilerMismatch {
				field: "optimizer enabled",
				expected: settings.optimizer_enabled().to_string(),
				found: compiler.optimizer_enabled.to_string(),
			});
		}
		// Runs only affect the output when the optimizer is on
		if compiler.optimizer_enabled && compiler.optimizer_runs != u64::from(settings.optimizer_runs())
		{
			return Err(DeployError::CompilerMismatch {
				field: "optimizer runs",
				expected: settings.optimizer_runs().to_string(),
				found: compiler.optimizer_runs.to_string(),
			});
		}
		Ok(())
	}
}

/// Directory of compiled artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
	root: PathBuf,
}

impl ArtifactStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Loads the artifact for a contract by name
	///
	/// When the same contract name appears in several source directories
	/// the shallowest path wins.
	pub fn load(&self, contract_name: &str) -> Result<ContractArtifact> {
		let path = self
			.artifact_files()?
			.into_iter()
			.find(|(name, _)| name == contract_name)
			.map(|(_, path)| path)
			.ok_or_else(|| DeployError::ArtifactNotFound {
				name: contract_name.to_string(),
				root: self.root.clone(),
				available: self.available_summary(),
			})?;

		debug!(contract = contract_name, path = %path.display(), "Loading artifact");
		let content = std::fs::read_to_string(&path)?;
		let json: Value = serde_json::from_str(&content).map_err(|e| {
			DeployError::InvalidArtifact(format!("Invalid JSON in {}: {}", path.display(), e))
		})?;

		let mut artifact = ContractArtifact::from_json(contract_name, &json)?;
		if artifact.compiler.is_none() {
			artifact.compiler = build_info_compiler(&path, contract_name)?;
		}
		Ok(artifact)
	}

	/// Lists the contract names available in the store
	pub fn list_available(&self) -> Result<Vec<String>> {
		let mut names: Vec<String> = self
			.artifact_files()?
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		names.sort();
		names.dedup();
		Ok(names)
	}

	fn available_summary(&self) -> String {
		match self.list_available() {
			Ok(names) if !names.is_empty() => names.join(", "),
			_ => "none".to_string(),
		}
	}

	/// Collects `(contract name, path)` for every artifact under the root,
	/// ordered by path depth
	fn artifact_files(&self) -> Result<Vec<(String, PathBuf)>> {
		let mut found = Vec::new();
		if self.root.is_dir() {
			collect_artifacts(&self.root, &mut found)?;
		}
		found.sort_by(|(_, a), (_, b)| {
			a.components()
				.count()
				.cmp(&b.components().count())
				.then_with(|| a.cmp(b))
		});
		Ok(found)
	}
}

/// Follows the Hardhat debug file next to an artifact to its build-info
///
/// Returns `None` when either file is absent.
fn build_info_compiler(
	artifact_path: &Path,
	contract_name: &str,
) -> Result<Option<ArtifactCompiler>> {
	let dbg_path = artifact_path.with_file_name(format!("{contract_name}.dbg.json"));
	let Some(dbg) = read_json_if_exists(&dbg_path)? else {
		return Ok(None);
	};
	let Some(build_info_ref) = dbg.get("buildInfo").and_then(Value::as_str) else {
		return Ok(None);
	};

	let build_info_path = dbg_path
		.parent()
		.map(|dir| dir.join(build_info_ref))
		.unwrap_or_else(|| PathBuf::from(build_info_ref));
	let Some(build_info) = read_json_if_exists(&build_info_path)? else {
		debug!(path = %build_info_path.display(), "Build info referenced by artifact is missing");
		return Ok(None);
	};

	debug!(
		contract = contract_name,
		path = %build_info_path.display(),
		"Read compiler settings from build info"
	);
	Ok(ArtifactCompiler::from_build_info(&build_info))
}

fn read_json_if_exists(path: &Path) -> Result<Option<Value>> {
	if !path.is_file() {
		return Ok(None);
	}
	let content = std::fs::read_to_string(path)?;
	serde_json::from_str(&content).map(Some).map_err(|e| {
		DeployError::InvalidArtifact(format!("Invalid JSON in {}: {}", path.display(), e))
	})
}

fn collect_artifacts(dir: &Path, found: &mut Vec<(String, PathBuf)>) -> Result<()> {
	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};

		if path.is_dir() {
			if file_name == "build-info" {
				continue;
			}
			collect_artifacts(&path, found)?;
			continue;
		}

		let in_source_dir = dir
			.file_name()
			.and_then(|n| n.to_str())
			.is_some_and(|n| n.ends_with(".sol"));
		if !in_source_dir || file_name.ends_with(".dbg.json") {
			continue;
		}
		if let Some(name) = file_name.strip_suffix(".json") {
			found.push((name.to_string(), path.clone()));
		}
	}
	Ok(())
}
