//! Account management for the tender lifecycle engine.
//!
//! An account is the caller identity a session is bound to: it supplies the
//! `from` address for calls and gas estimates, and the signer used when
//! transactions are submitted.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tender_types::SecretString;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

pub use implementations::local::LocalWallet;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when no account is available from the source.
	#[error("No account available: {0}")]
	Unavailable(String),
}

/// Trait defining the interface for account sources.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address of the active account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Returns the signer used to authorize submitted transactions.
	fn signer(&self) -> PrivateKeySigner;
}

/// Builds the account source from a configured private key.
pub fn create_account(
	private_key: Option<&SecretString>,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	let key = private_key
		.filter(|k| !k.is_empty())
		.ok_or_else(|| AccountError::Unavailable("no private key configured".to_string()))?;
	let wallet = LocalWallet::new(key.expose_secret())?;
	tracing::debug!(address = %wallet.address_sync(), "Loaded local account");
	Ok(Box::new(wallet))
}

#[cfg(test)]
mod tests {
	use super::*;

	const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_account_error_display() {
		let err = AccountError::InvalidKey("bad key".to_string());
		assert_eq!(format!("{}", err), "Invalid key: bad key");

		let err = AccountError::Unavailable("locked".to_string());
		assert_eq!(format!("{}", err), "No account available: locked");
	}

	#[tokio::test]
	async fn test_create_account_from_key() {
		let secret = SecretString::from(ANVIL_KEY);
		let account = create_account(Some(&secret)).unwrap();
		let address = account.address().await.unwrap();
		assert_eq!(
			address.to_string().to_lowercase(),
			"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
		);
	}

	#[test]
	fn test_create_account_without_key() {
		assert!(matches!(
			create_account(None),
			Err(AccountError::Unavailable(_))
		));
		let empty = SecretString::from("");
		assert!(matches!(
			create_account(Some(&empty)),
			Err(AccountError::Unavailable(_))
		));
	}
}
