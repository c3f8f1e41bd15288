//! Pluggable bearer-token storage.
//!
//! A token store persists the access token under the credential fingerprint
//! key so that repeated client constructions with the same credentials reuse
//! a cached token instead of re-authenticating. Staleness is not tracked
//! here — an expired token is discovered reactively through a 401 and
//! replaced.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memcached;
mod session;

pub use file::FileStorage;
pub use memcached::MemcachedStorage;
pub use session::SessionStorage;

/// Errors raised by token storage backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Filesystem or socket I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external cache backend misbehaved.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Persistence contract for bearer tokens.
///
/// Implementations must treat an empty stored value exactly like a missing
/// one: `get` never returns `Some("")`.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Look up the token cached under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures; an unknown key is
    /// `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist `token` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    async fn set(&self, key: &str, token: &str) -> Result<(), StorageError>;
}

/// Empty values normalize to "no token cached".
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn non_empty_drops_empty_values() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("tok".into()), Some("tok".into()));
    }

    /// The trait must stay object-safe: the client stores
    /// `Arc<dyn TokenStorage>`.
    #[test]
    fn trait_is_object_safe() {
        fn assert_obj(_: &dyn TokenStorage) {}
        let storage = SessionStorage::new();
        assert_obj(&storage);
    }
}
