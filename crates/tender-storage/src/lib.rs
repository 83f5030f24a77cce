//! Client-side storage for the tender lifecycle engine.
//!
//! The ledger is the only system of record. What is stored here is either a
//! hint (the last connected account) or a cache that can be rebuilt by
//! replaying the event log (replay cursors). Losing this storage never loses
//! data.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub use implementations::file::FileStorage;
pub use implementations::memory::MemoryStorage;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found: {0}")]
	NotFound(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Namespaces used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Last account a session was established for.
	AccountHint,
	/// Replay checkpoints per (chain, contract, event kind).
	ReplayCursor,
}

impl StorageKey {
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::AccountHint => "account_hint",
			StorageKey::ReplayCursor => "replay_cursor",
		}
	}

	pub fn all() -> impl Iterator<Item = Self> {
		[StorageKey::AccountHint, StorageKey::ReplayCursor].into_iter()
	}
}

impl fmt::Display for StorageKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for StorageKey {
	type Err = StorageError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		StorageKey::all()
			.find(|key| key.as_str() == s)
			.ok_or_else(|| StorageError::NotFound(format!("unknown namespace '{s}'")))
	}
}

/// Low-level byte interface implemented by storage backends.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key. Missing keys are not an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// Typed access to a storage backend.
///
/// Values are stored as JSON under `"{namespace}:{id}"`.
pub struct StorageService {
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: StorageKey, id: &str) -> String {
		format!("{}:{}", namespace.as_str(), id)
	}

	/// Stores a serializable value, replacing any previous one.
	pub async fn store<T: Serialize + Sync>(
		&self,
		namespace: StorageKey,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: StorageKey,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Like [`retrieve`](Self::retrieve) but maps `NotFound` to `None`.
	pub async fn retrieve_optional<T: DeserializeOwned>(
		&self,
		namespace: StorageKey,
		id: &str,
	) -> Result<Option<T>, StorageError> {
		match self.retrieve(namespace, id).await {
			Ok(value) => Ok(Some(value)),
			Err(StorageError::NotFound(_)) => Ok(None),
			Err(e) => Err(e),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Checkpoint {
		last_block: u64,
	}

	#[test]
	fn test_storage_key_round_trip() {
		for key in StorageKey::all() {
			assert_eq!(key.as_str().parse::<StorageKey>().unwrap(), key);
		}
		assert!("orders".parse::<StorageKey>().is_err());
	}

	#[tokio::test]
	async fn test_service_uses_namespaced_keys() {
		let mut backend = MockStorageInterface::new();
		backend
			.expect_set_bytes()
			.withf(|key, _| key.to_string() == "replay_cursor:31337")
			.times(1)
			.returning(|_, _| Box::pin(async { Ok(()) }));

		let service = StorageService::new(Box::new(backend));
		service
			.store(
				StorageKey::ReplayCursor,
				"31337",
				&Checkpoint { last_block: 9 },
			)
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_retrieve_optional_maps_not_found() {
		let service = StorageService::new(Box::new(MemoryStorage::new()));
		let missing: Option<Checkpoint> = service
			.retrieve_optional(StorageKey::ReplayCursor, "nope")
			.await
			.unwrap();
		assert!(missing.is_none());

		service
			.store(StorageKey::ReplayCursor, "k", &Checkpoint { last_block: 3 })
			.await
			.unwrap();
		let found: Option<Checkpoint> = service
			.retrieve_optional(StorageKey::ReplayCursor, "k")
			.await
			.unwrap();
		assert_eq!(found, Some(Checkpoint { last_block: 3 }));
	}

	#[tokio::test]
	async fn test_retrieve_reports_corrupt_value() {
		let backend = MemoryStorage::new();
		backend
			.set_bytes("replay_cursor:bad", b"not json".to_vec())
			.await
			.unwrap();
		let service = StorageService::new(Box::new(backend));
		let result: Result<Checkpoint, _> = service.retrieve(StorageKey::ReplayCursor, "bad").await;
		assert!(matches!(result, Err(StorageError::Serialization(_))));
	}
}
