use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{StorageError, TokenStorage, non_empty};

/// Process-scoped token storage.
///
/// Tokens live in a shared in-memory map; the lifetime of the cache is the
/// lifetime of the handle (and its clones). Cloning shares the underlying
/// map, so a handle can be injected into several clients that should reuse
/// one session cache. No I/O is performed.
#[derive(Clone, Debug, Default)]
pub struct SessionStorage {
    entries: Arc<DashMap<String, String>>,
}

impl SessionStorage {
    /// Create an empty session cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for SessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .get(key)
            .map(|entry| entry.value().clone())
            .and_then(non_empty))
    }

    async fn set(&self, key: &str, token: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), token.to_owned());
        Ok(())
    }
}
