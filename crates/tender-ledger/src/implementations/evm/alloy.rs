//! Alloy-based ledger client.
//!
//! One [`AlloyLedger`] wraps one HTTP provider for one network. The provider
//! carries the caller's wallet so `send_transaction` signs locally. No retry
//! layer is installed: each request is attempted once and bounded by the
//! request timeout.

use crate::{LedgerConnector, LedgerError, LedgerInterface, LogQuery};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
};
use alloy_rpc_types::{Filter, Log, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{RpcError, TransportError};
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tender_types::{NetworkConfig, Transaction, TransactionReceipt};

/// Translates a transport error, keeping the node's error code and message.
fn map_transport_error(operation: &str, err: TransportError) -> LedgerError {
	match err {
		RpcError::ErrorResp(payload) => LedgerError::Rpc {
			code: payload.code,
			message: payload.message.to_string(),
			data: payload.data.as_ref().map(|d| d.get().to_string()),
		},
		RpcError::Transport(kind) => LedgerError::Unreachable(format!("{operation}: {kind}")),
		other => LedgerError::InvalidResponse(format!("{operation}: {other}")),
	}
}

/// Alloy-based ledger implementation for a single network.
pub struct AlloyLedger {
	provider: DynProvider,
	chain_id: u64,
	request_timeout: Duration,
	confirmation_timeout: Duration,
}

impl AlloyLedger {
	/// Creates a client for `rpc_url` that signs with `signer` on `chain_id`.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		signer: PrivateKeySigner,
		request_timeout: Duration,
		confirmation_timeout: Duration,
	) -> Result<Self, LedgerError> {
		let url = rpc_url.parse().map_err(|e| {
			LedgerError::Configuration(format!("Invalid RPC URL for network {}: {}", chain_id, e))
		})?;

		let chain_signer = signer.with_chain_id(Some(chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect_http(url)
			.erased();

		Ok(Self {
			provider,
			chain_id,
			request_timeout,
			confirmation_timeout,
		})
	}

	/// Awaits a single RPC request under the request timeout.
	async fn request<T, F>(&self, operation: &'static str, request: F) -> Result<T, LedgerError>
	where
		F: IntoFuture<Output = Result<T, TransportError>>,
	{
		match tokio::time::timeout(self.request_timeout, request).await {
			Ok(result) => result.map_err(|e| map_transport_error(operation, e)),
			Err(_) => Err(LedgerError::Timeout {
				operation,
				timeout: self.request_timeout,
			}),
		}
	}

	fn request_for(tx: &Transaction, from: Address) -> TransactionRequest {
		<TransactionRequest as From<Transaction>>::from(tx.clone()).from(from)
	}
}

#[async_trait]
impl LedgerInterface for AlloyLedger {
	async fn chain_id(&self) -> Result<u64, LedgerError> {
		self.request("eth_chainId", self.provider.get_chain_id())
			.await
	}

	async fn block_number(&self) -> Result<u64, LedgerError> {
		self.request("eth_blockNumber", self.provider.get_block_number())
			.await
	}

	async fn call(&self, tx: &Transaction, from: Address) -> Result<Bytes, LedgerError> {
		let request = Self::request_for(tx, from);
		self.request("eth_call", self.provider.call(request)).await
	}

	async fn estimate_gas(&self, tx: &Transaction, from: Address) -> Result<u64, LedgerError> {
		let request = Self::request_for(tx, from);
		let gas = self
			.request("eth_estimateGas", self.provider.estimate_gas(request))
			.await?;
		tracing::debug!(chain_id = self.chain_id, gas = gas, "Estimated gas");
		Ok(gas)
	}

	async fn send_transaction(&self, tx: Transaction, from: Address) -> Result<B256, LedgerError> {
		let request = <TransactionRequest as From<Transaction>>::from(tx).from(from);

		tracing::debug!(
			chain_id = self.chain_id,
			to = ?request.to,
			gas_limit = ?request.gas,
			data_len = request.input.input().map(|d| d.len()).unwrap_or(0),
			"Sending transaction"
		);

		let pending = self
			.request("eth_sendTransaction", self.provider.send_transaction(request))
			.await
			.inspect_err(|e| {
				tracing::error!(chain_id = self.chain_id, error = %e, "Transaction submission failed");
			})?;

		let tx_hash = *pending.tx_hash();
		tracing::info!(
			tx_hash = %tx_hash,
			chain_id = self.chain_id,
			"Transaction broadcast"
		);
		Ok(tx_hash)
	}

	async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, LedgerError> {
		let config = PendingTransactionConfig::new(hash)
			.with_required_confirmations(1)
			.with_timeout(Some(self.confirmation_timeout));

		let pending = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| match e {
				PendingTransactionError::TransportError(inner) => {
					map_transport_error("watch transaction", inner)
				},
				other => LedgerError::Unreachable(format!("Transaction watch failed: {other}")),
			})?;

		let confirmed_hash = pending.await.map_err(|e| match e {
			PendingTransactionError::TxWatcher(_) => LedgerError::Timeout {
				operation: "transaction confirmation",
				timeout: self.confirmation_timeout,
			},
			other => LedgerError::Unreachable(format!("Failed to confirm transaction: {other}")),
		})?;

		let receipt = self
			.request(
				"eth_getTransactionReceipt",
				self.provider.get_transaction_receipt(confirmed_hash),
			)
			.await?
			.ok_or_else(|| {
				LedgerError::InvalidResponse(format!(
					"Receipt for {} not found on chain {}",
					confirmed_hash, self.chain_id
				))
			})?;

		Ok(TransactionReceipt {
			hash: receipt.transaction_hash,
			block_number: receipt.block_number.unwrap_or_default(),
			gas_used: receipt.gas_used,
			success: receipt.status(),
		})
	}

	async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, LedgerError> {
		let filter = Filter::new()
			.address(query.address)
			.event_signature(query.event_signature)
			.from_block(query.from_block)
			.to_block(query.to_block);

		let logs = self
			.request("eth_getLogs", self.provider.get_logs(&filter))
			.await?;
		tracing::debug!(
			chain_id = self.chain_id,
			from_block = query.from_block,
			to_block = query.to_block,
			count = logs.len(),
			"Fetched logs"
		);
		Ok(logs)
	}
}

/// Builds [`AlloyLedger`] clients from network configuration.
#[derive(Debug, Clone)]
pub struct AlloyConnector {
	request_timeout: Duration,
	confirmation_timeout: Duration,
}

impl AlloyConnector {
	pub fn new(request_timeout: Duration, confirmation_timeout: Duration) -> Self {
		Self {
			request_timeout,
			confirmation_timeout,
		}
	}
}

impl LedgerConnector for AlloyConnector {
	fn connect(
		&self,
		chain_id: u64,
		network: &NetworkConfig,
		signer: PrivateKeySigner,
	) -> Result<Arc<dyn LedgerInterface>, LedgerError> {
		let http_url = network.get_http_url().ok_or_else(|| {
			LedgerError::Configuration(format!(
				"No HTTP RPC URL configured for network {}",
				chain_id
			))
		})?;

		let ledger = AlloyLedger::new(
			http_url,
			chain_id,
			signer,
			self.request_timeout,
			self.confirmation_timeout,
		)?;
		Ok(Arc::new(ledger))
	}
}
