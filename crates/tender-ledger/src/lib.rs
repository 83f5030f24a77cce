//! Ledger access for the tender lifecycle engine.
//!
//! This crate is the only place that speaks JSON-RPC. Everything above it
//! works against [`LedgerInterface`], which exposes the handful of operations
//! the engine needs: identify the chain, read, estimate, submit, wait for a
//! receipt and scan logs. None of the operations retry; a failure is returned
//! to the caller as is.

use alloy_primitives::{Address, Bytes, B256};
use alloy_rpc_types::Log;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tender_types::{NetworkConfig, Transaction, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::{AlloyConnector, AlloyLedger};

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
	/// The endpoint could not be reached or the transport failed.
	#[error("Endpoint unreachable: {0}")]
	Unreachable(String),
	/// The node answered with a JSON-RPC error, e.g. an execution revert.
	#[error("RPC error {code}: {message}")]
	Rpc {
		code: i64,
		message: String,
		data: Option<String>,
	},
	/// The request did not complete within the configured timeout.
	#[error("{operation} timed out after {timeout:?}")]
	Timeout {
		operation: &'static str,
		timeout: Duration,
	},
	/// The node answered with something the client could not interpret.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// The ledger client could not be built from configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl LedgerError {
	/// Remote error detail suitable for surfacing to a user, when the node provided one.
	pub fn remote_detail(&self) -> Option<String> {
		match self {
			LedgerError::Rpc { message, data, .. } => Some(match data {
				Some(data) => format!("{message} ({data})"),
				None => message.clone(),
			}),
			_ => None,
		}
	}
}

/// Log scan parameters. Both block bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogQuery {
	pub address: Address,
	pub event_signature: B256,
	pub from_block: u64,
	pub to_block: u64,
}

/// Operations against one network's ledger endpoint.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait LedgerInterface: Send + Sync {
	/// Chain ID reported by the endpoint.
	async fn chain_id(&self) -> Result<u64, LedgerError>;

	/// Latest block number.
	async fn block_number(&self) -> Result<u64, LedgerError>;

	/// Executes a read-only call as `from` and returns the raw return data.
	async fn call(&self, tx: &Transaction, from: Address) -> Result<Bytes, LedgerError>;

	/// Estimates the gas `tx` would use when sent by `from`.
	async fn estimate_gas(&self, tx: &Transaction, from: Address) -> Result<u64, LedgerError>;

	/// Signs and broadcasts `tx` from `from`. Returns once the node accepted it.
	async fn send_transaction(&self, tx: Transaction, from: Address) -> Result<B256, LedgerError>;

	/// Waits until the transaction is mined and returns its receipt.
	async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, LedgerError>;

	/// Returns logs matching `query`, in the order the node returned them.
	async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, LedgerError>;
}

/// Builds a ledger client for a configured network.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait LedgerConnector: Send + Sync {
	/// Creates a client bound to `chain_id` that signs with `signer`.
	///
	/// Building a client does not contact the endpoint; reachability is
	/// discovered by the first request.
	fn connect(
		&self,
		chain_id: u64,
		network: &NetworkConfig,
		signer: PrivateKeySigner,
	) -> Result<Arc<dyn LedgerInterface>, LedgerError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_remote_detail() {
		let err = LedgerError::Rpc {
			code: 3,
			message: "execution reverted: Only admin".to_string(),
			data: Some("0x08c379a0".to_string()),
		};
		assert_eq!(
			err.remote_detail().as_deref(),
			Some("execution reverted: Only admin (0x08c379a0)")
		);
		assert!(LedgerError::Unreachable("refused".into())
			.remote_detail()
			.is_none());
	}

	#[test]
	fn test_error_display() {
		let err = LedgerError::Timeout {
			operation: "eth_getLogs",
			timeout: Duration::from_secs(30),
		};
		assert_eq!(err.to_string(), "eth_getLogs timed out after 30s");
	}
}
