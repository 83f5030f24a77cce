//! Local private-key account.

use crate::{AccountError, AccountInterface};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

/// Local wallet implementation using Alloy's signer.
///
/// Suitable for development chains and operator-held keys. The key is parsed
/// once; the signer is cloned for each provider that needs it.
#[derive(Debug, Clone)]
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a new LocalWallet from a hex-encoded private key (with or without 0x prefix).
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.trim()
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	pub(crate) fn address_sync(&self) -> Address {
		self.signer.address()
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	fn signer(&self) -> PrivateKeySigner {
		self.signer.clone()
	}
}
