use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{StorageError, TokenStorage, non_empty};

/// File-backed token storage.
///
/// One file per credential fingerprint, named by the key, containing the raw
/// token bytes under a configurable directory. There is no TTL — a stale
/// token is only detected through a 401 and then overwritten.
#[derive(Clone, Debug)]
pub struct FileStorage {
    storage_folder: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `storage_folder`. The directory must exist
    /// and be writable before the first `set`.
    pub fn new(storage_folder: impl Into<PathBuf>) -> Self {
        Self {
            storage_folder: storage_folder.into(),
        }
    }

    /// The directory holding the token files.
    #[must_use]
    pub fn storage_folder(&self) -> &Path {
        &self.storage_folder
    }

    fn token_path(&self, key: &str) -> PathBuf {
        self.storage_folder.join(key)
    }

    /// Delete the token cached under `key`.
    ///
    /// Returns `Ok(false)` when there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be
    /// removed.
    pub async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.token_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[async_trait]
impl TokenStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.token_path(key)).await {
            Ok(contents) => Ok(non_empty(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, token: &str) -> Result<(), StorageError> {
        tokio::fs::write(self.token_path(key), token).await?;
        Ok(())
    }
}
