//! Builder for TransactionReceipt instances.

use crate::TransactionReceipt;
use alloy_primitives::B256;

/// Builder for creating TransactionReceipt instances with sensible defaults.
#[derive(Debug, Clone)]
pub struct TransactionReceiptBuilder {
	hash: B256,
	block_number: u64,
	gas_used: u64,
	success: bool,
}

impl Default for TransactionReceiptBuilder {
	fn default() -> Self {
		Self {
			hash: B256::from([0x11; 32]),
			block_number: 12345,
			gas_used: 21_000,
			success: true,
		}
	}
}

impl TransactionReceiptBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_hash(mut self, hash: B256) -> Self {
		self.hash = hash;
		self
	}

	pub fn with_block_number(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}

	pub fn with_gas_used(mut self, gas_used: u64) -> Self {
		self.gas_used = gas_used;
		self
	}

	/// Convenience method to create a reverted receipt.
	pub fn failed(mut self) -> Self {
		self.success = false;
		self
	}

	pub fn build(self) -> TransactionReceipt {
		TransactionReceipt {
			hash: self.hash,
			block_number: self.block_number,
			gas_used: self.gas_used,
			success: self.success,
		}
	}
}
