//! In-memory storage backend.
//!
//! Data lives for the lifetime of the process. Suitable for one-shot CLI
//! invocations where replay cursors are not wanted, and for tests.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local map of keys to serialized values. Clones share the map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
	entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		match self.entries.read().await.get(key) {
			Some(bytes) => Ok(bytes.clone()),
			None => Err(StorageError::NotFound(key.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		self.entries.write().await.insert(key.to_owned(), value);
		Ok(())
	}

	/// Deleting an absent key succeeds.
	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.entries.write().await.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self.entries.read().await.contains_key(key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_overwrite_and_delete() {
		let storage = MemoryStorage::new();

		storage.set_bytes("k", b"v1".to_vec()).await.unwrap();
		assert_eq!(storage.get_bytes("k").await.unwrap(), b"v1".to_vec());

		storage.set_bytes("k", b"v2".to_vec()).await.unwrap();
		assert_eq!(storage.get_bytes("k").await.unwrap(), b"v2".to_vec());

		storage.delete("k").await.unwrap();
		assert!(!storage.exists("k").await.unwrap());
		assert!(matches!(
			storage.get_bytes("k").await,
			Err(StorageError::NotFound(_))
		));

		storage.delete("never-existed").await.unwrap();
	}

	#[tokio::test]
	async fn test_clones_share_state() {
		let storage = MemoryStorage::new();
		let clone = storage.clone();
		storage.set_bytes("shared", vec![1]).await.unwrap();
		assert!(clone.exists("shared").await.unwrap());
	}
}
