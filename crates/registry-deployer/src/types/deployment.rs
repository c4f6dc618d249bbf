//! Values passed between the steps of a deployment
//!
//! A deployment moves through three values: the submitted transaction
//! ([`PendingDeployment`]), the mined contract ([`ConfirmedContract`]) and
//! the reported outcome ([`DeploymentResult`]).

use alloy_primitives::{Address, B256};

/// A deployment transaction that was accepted by the node but not yet mined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeployment {
	pub contract_name: String,
	pub tx_hash: B256,
}

/// A deployment transaction that was mined and left code at its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedContract {
	pub contract_name: String,
	pub tx_hash: B256,
	pub address: Address,
	pub block_number: Option<u64>,
	pub gas_used: u64,
}

/// Outcome of a successful deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
	pub contract_address: Address,
	pub deployment_transaction: B256,
}
