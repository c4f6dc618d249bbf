//! Deployment driver for the TweetRegistry contract
//!
//! Deploys one compiled contract to the network selected in the
//! configuration, waits for the deployment to be mined and reports the
//! resulting address. The run is single-attempt: any failure ends it.

pub mod cli;
pub mod constants;
pub mod core;
pub mod operations;
pub mod types;

pub use crate::core::{
	artifacts::{ArtifactCompiler, ArtifactStore, ContractArtifact},
	blockchain::AlloyDeployer,
};
pub use operations::deploy::{exit_status, DeploymentDriver, DeploymentReporter, TerminalReporter};
pub use types::{
	deployment::{ConfirmedContract, DeploymentResult, PendingDeployment},
	error::{DeployError, Result},
};

use alloy_primitives::Address;
use async_trait::async_trait;

/// The build and network collaborator a deployment runs against.
///
/// Implementations resolve the compiled contract, submit the deployment
/// transaction to a network and report its confirmation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeploymentInterface: Send + Sync {
	/// Submits a deployment transaction for the named contract artifact.
	///
	/// Returns once the node has accepted the transaction, before it is mined.
	async fn deploy(&self, contract_name: &str) -> Result<PendingDeployment>;

	/// Waits until the deployment transaction is confirmed.
	///
	/// This is the only point where a deployment suspends. Implementations
	/// must not add a timeout of their own.
	async fn await_confirmation(&self, pending: PendingDeployment) -> Result<ConfirmedContract>;

	/// Resolves the on-chain address of a confirmed contract.
	async fn get_address(&self, contract: &ConfirmedContract) -> Result<Address>;
}
