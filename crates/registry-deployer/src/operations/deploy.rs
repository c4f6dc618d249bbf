//! Contract deployment operation
//!
//! Runs the single-attempt deployment sequence: submit, wait for
//! confirmation, resolve the address, report. Any failure propagates to
//! the caller unchanged; nothing is retried or rolled back.

use crate::{
	cli::output::Display,
	core::logging,
	types::{deployment::DeploymentResult, error::Result},
	DeploymentInterface,
};
use alloy_primitives::Address;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Receives the two user-facing progress events of a deployment
pub trait DeploymentReporter: Send + Sync {
	/// The deployment transaction was accepted by the node
	fn deploying(&self, contract_name: &str);

	/// The contract is confirmed at `address`
	fn deployed(&self, contract_name: &str, address: &Address);
}

/// Line announcing that a deployment was submitted
pub fn deploying_message(contract_name: &str) -> String {
	format!("Deploying {contract_name}...")
}

/// Line announcing the confirmed address of a deployment
pub fn deployed_message(contract_name: &str, address: &Address) -> String {
	format!("{contract_name} deployed at: {address}")
}

/// Reports progress on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter;

impl DeploymentReporter for TerminalReporter {
	fn deploying(&self, contract_name: &str) {
		Display::info(&deploying_message(contract_name));
	}

	fn deployed(&self, contract_name: &str, address: &Address) {
		Display::success(&deployed_message(contract_name, address));
	}
}

/// One-shot deployment of a single named contract
#[derive(Clone)]
pub struct DeploymentDriver {
	deployer: Arc<dyn DeploymentInterface>,
	contract_name: String,
}

impl DeploymentDriver {
	/// Creates a driver deploying `contract_name` through `deployer`
	pub fn new(deployer: Arc<dyn DeploymentInterface>, contract_name: impl Into<String>) -> Self {
		Self {
			deployer,
			contract_name: contract_name.into(),
		}
	}

	/// Deploys the contract and reports the outcome
	///
	/// The address is reported only after the confirmation step returns.
	///
	/// # Errors
	/// Returns the first error raised by the collaborator, whether from
	/// compilation artifacts, the network, or an on-chain rejection
	pub async fn run(&self, reporter: &dyn DeploymentReporter) -> Result<DeploymentResult> {
		let started = Instant::now();
		logging::operation_start("deploy", &self.contract_name);

		let pending = self.deployer.deploy(&self.contract_name).await?;
		info!(
			contract = %self.contract_name,
			tx_hash = %pending.tx_hash,
			"Deployment transaction submitted"
		);
		reporter.deploying(&self.contract_name);

		let confirmed = self.deployer.await_confirmation(pending).await?;
		logging::operation_progress("deploy", "confirmed");

		let address = self.deployer.get_address(&confirmed).await?;
		reporter.deployed(&self.contract_name, &address);

		let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
		logging::operation_complete("deploy", elapsed_ms);
		Ok(DeploymentResult {
			contract_address: address,
			deployment_transaction: confirmed.tx_hash,
		})
	}
}

/// Process exit status for a deployment outcome: 0 on success, 1 on failure
pub fn exit_status<T, E>(result: &std::result::Result<T, E>) -> u8 {
	match result {
		Ok(_) => 0,
		Err(_) => 1,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		types::{
			deployment::{ConfirmedContract, PendingDeployment},
			error::DeployError,
		},
		MockDeploymentInterface,
	};
	use alloy_primitives::{address, B256};
	use std::sync::Mutex;

	const CONTRACT: &str = "TweetRegistry";
	const TX_HASH: B256 = B256::repeat_byte(0xab);
	const DEPLOYED: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

	/// Records reporter events into a log shared with the mock collaborator
	#[derive(Default, Clone)]
	struct RecordingReporter {
		events: Arc<Mutex<Vec<String>>>,
	}

	impl RecordingReporter {
		fn events(&self) -> Vec<String> {
			self.events.lock().unwrap().clone()
		}
	}

	impl DeploymentReporter for RecordingReporter {
		fn deploying(&self, contract_name: &str) {
			self.events
				.lock()
				.unwrap()
				.push(deploying_message(contract_name));
		}

		fn deployed(&self, contract_name: &str, address: &Address) {
			self.events
				.lock()
				.unwrap()
				.push(deployed_message(contract_name, address));
		}
	}

	fn pending() -> PendingDeployment {
		PendingDeployment {
			contract_name: CONTRACT.to_string(),
			tx_hash: TX_HASH,
		}
	}

	fn confirmed(address: Address) -> ConfirmedContract {
		ConfirmedContract {
			contract_name: CONTRACT.to_string(),
			tx_hash: TX_HASH,
			address,
			block_number: Some(1),
			gas_used: 21_000,
		}
	}

	fn successful_mock(address: Address) -> MockDeploymentInterface {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy()
			.withf(|name| name.to_string() == CONTRACT)
			.times(1)
			.returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.times(1)
			.returning(move |_| Ok(confirmed(address)));
		mock.expect_get_address()
			.times(1)
			.returning(|contract| Ok(contract.address));
		mock
	}

	fn has_address(events: &[String]) -> bool {
		events.iter().any(|e| e.contains("deployed at:"))
	}

	#[tokio::test]
	async fn test_reports_address_from_collaborator() {
		let reporter = RecordingReporter::default();
		let driver = DeploymentDriver::new(Arc::new(successful_mock(DEPLOYED)), CONTRACT);

		let result = driver.run(&reporter).await;

		assert_eq!(exit_status(&result), 0);
		let result = result.unwrap();
		assert_eq!(result.contract_address, DEPLOYED);
		assert_eq!(result.deployment_transaction, TX_HASH);
		assert_eq!(
			reporter.events(),
			vec![
				"Deploying TweetRegistry...".to_string(),
				format!("TweetRegistry deployed at: {DEPLOYED}"),
			]
		);
	}

	#[tokio::test]
	async fn test_reported_address_is_get_address_result() {
		// get_address is the source of truth, not the receipt
		let resolved = address!("00000000000000000000000000000000000000c0");
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.returning(|_| Ok(confirmed(DEPLOYED)));
		mock.expect_get_address().returning(move |_| Ok(resolved));

		let reporter = RecordingReporter::default();
		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await
			.unwrap();

		assert_eq!(result.contract_address, resolved);
		assert_eq!(
			reporter.events().last().unwrap(),
			&format!("TweetRegistry deployed at: {resolved}")
		);
	}

	#[tokio::test]
	async fn test_compile_error_prints_no_address() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().times(1).returning(|_| {
			Err(DeployError::CompilerMismatch {
				field: "solc version",
				expected: "0.8.28".into(),
				found: "0.8.20".into(),
			})
		});
		mock.expect_await_confirmation().never();
		mock.expect_get_address().never();

		let reporter = RecordingReporter::default();
		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await;

		assert_eq!(exit_status(&result), 1);
		assert!(reporter.events().is_empty());
	}

	#[tokio::test]
	async fn test_network_error_on_submit_prints_no_address() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy()
			.returning(|_| Err(DeployError::Network("connection refused".into())));
		mock.expect_await_confirmation().never();
		mock.expect_get_address().never();

		let reporter = RecordingReporter::default();
		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await;

		assert!(matches!(result, Err(DeployError::Network(_))));
		assert_eq!(exit_status(&result), 1);
		assert!(!has_address(&reporter.events()));
	}

	#[tokio::test]
	async fn test_reverted_transaction_prints_no_address() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.returning(|_| Err(DeployError::Reverted("status 0".into())));
		mock.expect_get_address().never();

		let reporter = RecordingReporter::default();
		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await;

		assert!(matches!(result, Err(DeployError::Reverted(_))));
		assert_eq!(exit_status(&result), 1);
		assert_eq!(reporter.events(), vec!["Deploying TweetRegistry...".to_string()]);
	}

	#[tokio::test]
	async fn test_confirmation_network_timeout_exits_with_one() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.returning(|_| Err(DeployError::Network("network timeout".into())));
		mock.expect_get_address().never();

		let reporter = RecordingReporter::default();
		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await;

		let status = exit_status(&result);
		let err = result.unwrap_err();
		assert!(err.to_string().contains("network timeout"));
		assert_eq!(status, 1);
		assert!(!has_address(&reporter.events()));
	}

	#[tokio::test]
	async fn test_address_reported_only_after_confirmation() {
		let reporter = RecordingReporter::default();
		let log = reporter.events.clone();

		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().returning(|_| Ok(pending()));
		mock.expect_await_confirmation().returning(move |_| {
			log.lock().unwrap().push("confirmed".to_string());
			Ok(confirmed(DEPLOYED))
		});
		mock.expect_get_address()
			.returning(|contract| Ok(contract.address));

		DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&reporter)
			.await
			.unwrap();

		let events = reporter.events();
		let confirmed_at = events.iter().position(|e| e == "confirmed").unwrap();
		let reported_at = events.iter().position(|e| e.contains("deployed at:")).unwrap();
		assert!(confirmed_at < reported_at);
		assert_eq!(events[0], "Deploying TweetRegistry...");
	}

	#[tokio::test]
	async fn test_pending_deployment_passed_to_confirmation() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.withf(|p| *p == pending())
			.times(1)
			.returning(|_| Ok(confirmed(DEPLOYED)));
		mock.expect_get_address()
			.withf(|c| c.tx_hash == TX_HASH)
			.returning(|c| Ok(c.address));

		let result = DeploymentDriver::new(Arc::new(mock), CONTRACT)
			.run(&RecordingReporter::default())
			.await;
		assert!(result.is_ok());
	}

	#[tokio::test]
	async fn test_independent_runs_share_no_state() {
		let first_address = address!("00000000000000000000000000000000000000a1");
		let second_address = address!("00000000000000000000000000000000000000b2");

		let first_reporter = RecordingReporter::default();
		let first = DeploymentDriver::new(Arc::new(successful_mock(first_address)), CONTRACT)
			.run(&first_reporter)
			.await
			.unwrap();

		let second_reporter = RecordingReporter::default();
		let second = DeploymentDriver::new(Arc::new(successful_mock(second_address)), CONTRACT)
			.run(&second_reporter)
			.await
			.unwrap();

		assert_eq!(first.contract_address, first_address);
		assert_eq!(second.contract_address, second_address);
		assert_eq!(first_reporter.events().len(), 2);
		assert_eq!(second_reporter.events().len(), 2);
		assert!(second_reporter.events()[1].contains(&second_address.to_string()));
	}

	#[tokio::test]
	async fn test_same_driver_runs_twice() {
		let mut mock = MockDeploymentInterface::new();
		mock.expect_deploy().times(2).returning(|_| Ok(pending()));
		mock.expect_await_confirmation()
			.times(2)
			.returning(|_| Ok(confirmed(DEPLOYED)));
		mock.expect_get_address()
			.times(2)
			.returning(|c| Ok(c.address));

		let driver = DeploymentDriver::new(Arc::new(mock), CONTRACT);
		let first = driver.run(&RecordingReporter::default()).await.unwrap();
		let second = driver.run(&RecordingReporter::default()).await.unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_terminal_lines() {
		assert_eq!(deploying_message(CONTRACT), "Deploying TweetRegistry...");
		assert_eq!(
			deployed_message(CONTRACT, &DEPLOYED),
			"TweetRegistry deployed at: 0x5FbDB2315678afecb367f032d93F642f64180aa3"
		);
	}

	#[test]
	fn test_exit_status() {
		assert_eq!(exit_status::<(), ()>(&Ok(())), 0);
		assert_eq!(exit_status::<(), &str>(&Err("deployment failed")), 1);
	}
}
