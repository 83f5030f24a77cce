//! File-based storage backend.
//!
//! Each key is one file under the base directory. Writes go to a temporary
//! file that is renamed into place while holding an exclusive lock on a
//! sibling `.lock` file, so two CLI processes sharing a directory never
//! observe a half-written value.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use fs2::FileExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

fn backend(context: &str) -> impl Fn(std::io::Error) -> StorageError + '_ {
	move |e| StorageError::Backend(format!("{context}: {e}"))
}

/// Storage rooted at a directory, one JSON file per key.
pub struct FileStorage {
	root: PathBuf,
}

impl FileStorage {
	pub fn new(root: PathBuf) -> Self {
		Self { root }
	}

	/// `account_hint:31337` is stored as `account_hint_31337.json`.
	fn key_path(&self, key: &str) -> PathBuf {
		let file_stem = key.replace(['/', ':', '\\'], "_");
		self.root.join(format!("{file_stem}.json"))
	}

	/// Blocks on an exclusive lock of the `.lock` sibling of `path`. The lock
	/// is held until the returned file is unlocked or dropped.
	async fn lock(path: &Path) -> Result<std::fs::File, StorageError> {
		let lock_path = path.with_extension("lock");
		tokio::task::spawn_blocking(move || {
			let file = std::fs::OpenOptions::new()
				.create(true)
				.truncate(false)
				.write(true)
				.open(&lock_path)
				.map_err(backend("open lock file"))?;
			FileExt::lock_exclusive(&file).map_err(backend("acquire lock"))?;
			Ok::<_, StorageError>(file)
		})
		.await
		.map_err(|e| StorageError::Backend(format!("lock task failed: {e}")))?
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		fs::read(self.key_path(key)).await.map_err(|e| match e.kind() {
			ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
			_ => StorageError::Backend(format!("read {key}: {e}")),
		})
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		fs::create_dir_all(&self.root)
			.await
			.map_err(backend("create storage directory"))?;

		let path = self.key_path(key);
		let staged = path.with_extension("tmp");
		let lock = Self::lock(&path).await?;

		let written = async {
			fs::write(&staged, &value).await.map_err(backend("write"))?;
			fs::rename(&staged, &path).await.map_err(backend("rename"))
		}
		.await;

		if let Err(e) = FileExt::unlock(&lock) {
			tracing::warn!(error = %e, key = %key, "Failed to release storage lock");
		}
		written?;

		tracing::trace!(key = %key, bytes = value.len(), "Stored value");
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		match fs::remove_file(self.key_path(key)).await {
			Err(e) if e.kind() != ErrorKind::NotFound => Err(backend("delete")(e)),
			_ => Ok(()),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		fs::try_exists(self.key_path(key))
			.await
			.map_err(backend("stat"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_persists_across_instances() {
		let temp_dir = TempDir::new().unwrap();

		let storage = FileStorage::new(temp_dir.path().to_path_buf());
		storage
			.set_bytes("account_hint:31337", b"\"0xabc\"".to_vec())
			.await
			.unwrap();

		let reopened = FileStorage::new(temp_dir.path().to_path_buf());
		assert_eq!(
			reopened.get_bytes("account_hint:31337").await.unwrap(),
			b"\"0xabc\"".to_vec()
		);
		assert!(temp_dir.path().join("account_hint_31337.json").exists());
	}

	#[tokio::test]
	async fn test_missing_and_delete() {
		let temp_dir = TempDir::new().unwrap();
		let storage = FileStorage::new(temp_dir.path().join("nested"));

		assert!(matches!(
			storage.get_bytes("nothing").await,
			Err(StorageError::NotFound(_))
		));
		assert!(!storage.exists("nothing").await.unwrap());
		storage.delete("nothing").await.unwrap();

		storage.set_bytes("k", vec![1, 2, 3]).await.unwrap();
		assert!(storage.exists("k").await.unwrap());
		storage.delete("k").await.unwrap();
		assert!(!storage.exists("k").await.unwrap());
	}

	#[tokio::test]
	async fn test_overwrite_replaces_value() {
		let temp_dir = TempDir::new().unwrap();
		let storage = FileStorage::new(temp_dir.path().to_path_buf());

		storage.set_bytes("k", vec![1; 64]).await.unwrap();
		storage.set_bytes("k", vec![2]).await.unwrap();
		assert_eq!(storage.get_bytes("k").await.unwrap(), vec![2]);
	}
}
