//! Transaction types for ledger interactions.
//!
//! These types are the engine's view of a transaction and its outcome,
//! independent of the RPC client used to deliver it.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types::TransactionRequest;
use serde::{Deserialize, Serialize};

/// A contract call or transaction to be sent to the ledger.
///
/// The sender is not part of the transaction; it is supplied by whoever
/// delivers it (the caller account for submissions and estimates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	pub to: Address,
	pub data: Bytes,
	pub value: U256,
	pub chain_id: u64,
	/// Explicit gas budget. `None` leaves it to the provider.
	pub gas_limit: Option<u64>,
}

impl Transaction {
	pub fn call(to: Address, data: impl Into<Bytes>, chain_id: u64) -> Self {
		Self {
			to,
			data: data.into(),
			value: U256::ZERO,
			chain_id,
			gas_limit: None,
		}
	}

	pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = Some(gas_limit);
		self
	}
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let mut request = TransactionRequest::default()
			.to(tx.to)
			.input(tx.data.into())
			.value(tx.value);
		request.chain_id = Some(tx.chain_id);
		request.gas = tx.gas_limit;
		request
	}
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	pub hash: B256,
	pub block_number: u64,
	pub gas_used: u64,
	/// `false` when the transaction reverted.
	pub success: bool,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn test_transaction_into_request() {
		let to = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
		let tx = Transaction::call(to, vec![0xde, 0xad], 31337).with_gas_limit(90_000);
		let request: TransactionRequest = tx.into();

		assert_eq!(request.gas, Some(90_000));
		assert_eq!(request.chain_id, Some(31337));
		assert_eq!(
			request.input.input().map(|b| b.to_vec()),
			Some(vec![0xde, 0xad])
		);
	}
}
