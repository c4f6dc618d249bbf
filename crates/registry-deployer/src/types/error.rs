//! Error types and result handling for the deployment driver
//!
//! Every variant counts as "deployment failed" to the caller. The variants
//! only exist so the diagnostic printed at the top level names the cause.

use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors raised while resolving, submitting or confirming a deployment
#[derive(thiserror::Error, Debug)]
pub enum DeployError {
	// Build errors
	#[error("Artifact for contract {name} not found in {} (available: {available})", .root.display())]
	ArtifactNotFound {
		name: String,
		root: PathBuf,
		available: String,
	},

	#[error("Invalid artifact: {0}")]
	InvalidArtifact(String),

	#[error("Artifact was compiled with {field} {found}, expected {expected}")]
	CompilerMismatch {
		field: &'static str,
		expected: String,
		found: String,
	},

	// Network errors
	#[error("RPC request failed: {0}")]
	Network(String),

	#[error("Connected to chain {actual}, expected chain {expected}")]
	ChainMismatch { expected: u64, actual: u64 },

	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),

	// On-chain rejection
	#[error("Deployment transaction reverted: {0}")]
	Reverted(String),

	#[error("Invalid signer: {0}")]
	InvalidSigner(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Maps a JSON-RPC error message onto the closest error variant.
///
/// Nodes report funding and execution failures as plain error strings, so
/// the message text is the only signal available.
pub fn classify_rpc_error(message: impl Into<String>) -> DeployError {
	let message = message.into();
	let lowered = message.to_lowercase();

	if lowered.contains("insufficient funds") {
		DeployError::InsufficientFunds(message)
	} else if lowered.contains("revert") {
		DeployError::Reverted(message)
	} else {
		DeployError::Network(message)
	}
}
