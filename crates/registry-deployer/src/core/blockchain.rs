//! Alloy-backed deployment over JSON-RPC
//!
//! Signs contract-creation transactions with a local key, submits them to
//! the configured node and waits for them to be mined. Nothing is retried:
//! the first RPC failure ends the deployment.

use crate::{
	core::artifacts::ArtifactStore,
	types::{
		deployment::{ConfirmedContract, PendingDeployment},
		error::{classify_rpc_error, DeployError, Result},
	},
	DeploymentInterface,
};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_provider::{
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use registry_config::{CompilerSettings, NetworkConfig};
use tracing::{debug, info};

/// Deploys compiled artifacts to an EVM node through an Alloy provider
pub struct AlloyDeployer {
	provider: DynProvider,
	deployer_address: Address,
	expected_chain_id: Option<u64>,
	artifacts: ArtifactStore,
	compiler: CompilerSettings,
	confirmations: u64,
}

impl AlloyDeployer {
	/// Creates a deployer for one network
	///
	/// The provider connects lazily, so this does not touch the network.
	///
	/// # Errors
	/// Returns error if the network has no private key, the key is not
	/// valid hex, or the RPC URL cannot be parsed
	pub fn new(
		network: &NetworkConfig,
		artifacts: ArtifactStore,
		compiler: CompilerSettings,
		confirmations: u64,
	) -> Result<Self> {
		let key = network
			.private_key
			.as_deref()
			.filter(|key| !key.trim().is_empty())
			.ok_or_else(|| DeployError::InvalidSigner("no private key configured".to_string()))?;
		let signer: PrivateKeySigner = key
			.trim()
			.parse()
			.map_err(|e| DeployError::InvalidSigner(format!("{e}")))?;
		let deployer_address = signer.address();

		let url = network
			.url
			.parse()
			.map_err(|e| DeployError::Network(format!("Invalid RPC URL {}: {}", network.url, e)))?;

		let provider = ProviderBuilder::new()
			.wallet(EthereumWallet::from(signer))
			.connect_http(url)
			.erased();

		Ok(Self {
			provider,
			deployer_address,
			expected_chain_id: network.chain_id,
			artifacts,
			compiler,
			confirmations,
		})
	}

	/// Address of the account paying for the deployment
	pub fn deployer_address(&self) -> Address {
		self.deployer_address
	}

	async fn check_chain_id(&self) -> Result<()> {
		let Some(expected) = self.expected_chain_id else {
			return Ok(());
		};

		let actual = self
			.provider
			.get_chain_id()
			.await
			.map_err(|e| DeployError::Network(format!("Failed to get chain id: {e}")))?;
		if actual != expected {
			return Err(DeployError::ChainMismatch { expected, actual });
		}
		Ok(())
	}
}

#[async_trait]
impl DeploymentInterface for AlloyDeployer {
	async fn deploy(&self, contract_name: &str) -> Result<PendingDeployment> {
		let artifact = self.artifacts.load(contract_name)?;
		artifact.verify_compiler(&self.compiler)?;
		self.check_chain_id().await?;

		debug!(
			contract = contract_name,
			bytecode_len = artifact.bytecode.len(),
			from = %self.deployer_address,
			"Submitting deployment transaction"
		);

		let tx = TransactionRequest::default()
			.with_from(self.deployer_address)
			.with_deploy_code(artifact.bytecode);

		let pending = self
			.provider
			.send_transaction(tx)
			.await
			.map_err(|e| classify_rpc_error(e.to_string()))?;

		Ok(PendingDeployment {
			contract_name: contract_name.to_string(),
			tx_hash: *pending.tx_hash(),
		})
	}

	async fn await_confirmation(&self, pending: PendingDeployment) -> Result<ConfirmedContract> {
		info!(
			tx_hash = %pending.tx_hash,
			confirmations = self.confirmations,
			"Waiting for deployment confirmation"
		);

		// No timeout: an unanswered node leaves the deployment waiting
		let config = PendingTransactionConfig::new(pending.tx_hash)
			.with_required_confirmations(self.confirmations)
			.with_timeout(None);

		let watcher = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| match e {
				PendingTransactionError::FailedToRegister => {
					DeployError::Network("Failed to register transaction watcher".to_string())
				},
				other => DeployError::Network(format!("Transaction watch failed: {other}")),
			})?;
		let tx_hash = watcher
			.await
			.map_err(|e| DeployError::Network(format!("Failed to confirm transaction: {e}")))?;

		let receipt = self
			.provider
			.get_transaction_receipt(tx_hash)
			.await
			.map_err(|e| DeployError::Network(format!("Failed to get receipt: {e}")))?
			.ok_or_else(|| DeployError::Network(format!("Receipt for {tx_hash} not found")))?;

		if !receipt.status() {
			return Err(DeployError::Reverted(format!(
				"transaction {tx_hash} failed in block {:?}",
				receipt.block_number
			)));
		}

		let address = receipt.contract_address.ok_or_else(|| {
			DeployError::Reverted(format!("receipt for {tx_hash} has no contract address"))
		})?;

		let code = self
			.provider
			.get_code_at(address)
			.await
			.map_err(|e| DeployError::Network(format!("Failed to get code: {e}")))?;
		if code.is_empty() {
			return Err(DeployError::Reverted(format!("no code at {address}")));
		}

		debug!(
			address = %address,
			block_number = ?receipt.block_number,
			gas_used = receipt.gas_used,
			"Deployment mined"
		);

		Ok(ConfirmedContract {
			contract_name: pending.contract_name,
			tx_hash,
			address,
			block_number: receipt.block_number,
			gas_used: receipt.gas_used,
		})
	}

	async fn get_address(&self, contract: &ConfirmedContract) -> Result<Address> {
		Ok(contract.address)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use registry_config::defaults;

	fn network(url: &str, private_key: Option<&str>) -> NetworkConfig {
		NetworkConfig {
			url: url.to_string(),
			private_key: private_key.map(str::to_string),
			chain_id: None,
		}
	}

	fn deployer(network: &NetworkConfig) -> Result<AlloyDeployer> {
		AlloyDeployer::new(
			network,
			ArtifactStore::new("artifacts"),
			CompilerSettings::default(),
			1,
		)
	}

	#[tokio::test]
	async fn test_new_with_dev_key() {
		let deployer = deployer(&NetworkConfig::localhost()).unwrap();
		assert_eq!(
			deployer.deployer_address(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
				.parse::<Address>()
				.unwrap()
		);
	}

	#[tokio::test]
	async fn test_new_accepts_key_without_prefix() {
		let key = defaults::DEV_PRIVATE_KEY.trim_start_matches("0x");
		assert!(deployer(&network(defaults::LOCALHOST_RPC_URL, Some(key))).is_ok());
	}

	#[tokio::test]
	async fn test_new_without_key_fails() {
		let result = deployer(&network(defaults::LOCALHOST_RPC_URL, None));
		assert!(matches!(result, Err(DeployError::InvalidSigner(_))));
	}

	#[tokio::test]
	async fn test_new_with_empty_key_fails() {
		let result = deployer(&network(defaults::LOCALHOST_RPC_URL, Some("")));
		assert!(matches!(result, Err(DeployError::InvalidSigner(msg)) if msg.contains("no private key")));
	}

	#[tokio::test]
	async fn test_new_with_invalid_key_fails() {
		let result = deployer(&network(defaults::LOCALHOST_RPC_URL, Some("0xnothex")));
		assert!(matches!(result, Err(DeployError::InvalidSigner(_))));
	}

	#[tokio::test]
	async fn test_new_with_invalid_url_fails() {
		let result = deployer(&network("not a url", Some(defaults::DEV_PRIVATE_KEY)));
		assert!(matches!(result, Err(DeployError::Network(msg)) if msg.contains("not a url")));
	}

	#[tokio::test]
	async fn test_deploy_fails_before_network_when_artifact_missing() {
		let deployer = AlloyDeployer::new(
			&NetworkConfig::localhost(),
			ArtifactStore::new("/nonexistent/artifacts"),
			CompilerSettings::default(),
			1,
		)
		.unwrap();

		let result = deployer.deploy("TweetRegistry").await;
		assert!(matches!(result, Err(DeployError::ArtifactNotFound { .. })));
	}
}
