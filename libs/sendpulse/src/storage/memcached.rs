use async_trait::async_trait;
use memcache_async::ascii::Protocol;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

use super::{StorageError, TokenStorage, non_empty};

/// Default key TTL applied on `set` (one hour, matching the token lifetime
/// the API hands out).
pub const DEFAULT_KEY_TTL: u32 = 3600;

type Connection = Protocol<Compat<TcpStream>>;

/// Memcached-backed token storage (ASCII protocol).
///
/// Unlike the session and file backends this one applies an explicit TTL on
/// every write, so the cache itself evicts stale tokens. In persistent mode
/// one connection is kept open and reused across operations; otherwise each
/// operation dials a fresh connection.
pub struct MemcachedStorage {
    addr: String,
    key_ttl: u32,
    persistent: bool,
    connection: Mutex<Option<Connection>>,
}

impl MemcachedStorage {
    /// Create a store talking to `host:port`.
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self {
            addr: format!("{}:{port}", host.as_ref()),
            key_ttl: DEFAULT_KEY_TTL,
            persistent: false,
            connection: Mutex::new(None),
        }
    }

    /// Override the TTL applied on `set`.
    #[must_use]
    pub fn key_ttl(mut self, seconds: u32) -> Self {
        self.key_ttl = seconds;
        self
    }

    /// Keep one connection open across operations instead of dialing per
    /// call.
    #[must_use]
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    async fn connect(&self) -> Result<Connection, StorageError> {
        let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            StorageError::Backend(format!(
                "failed to connect to memcached at {}: {e}",
                self.addr
            ))
        })?;
        Ok(Protocol::new(stream.compat()))
    }
}

impl std::fmt::Debug for MemcachedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcachedStorage")
            .field("addr", &self.addr)
            .field("key_ttl", &self.key_ttl)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenStorage for MemcachedStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let result = if self.persistent {
            let mut guard = self.connection.lock().await;
            if guard.is_none() {
                *guard = Some(self.connect().await?);
            }
            let conn = guard.as_mut().expect("connection just established");
            let result = conn.get(&key).await;
            // A dead persistent connection is dropped so the next call
            // redials.
            if result
                .as_ref()
                .is_err_and(|e| e.kind() != std::io::ErrorKind::NotFound)
            {
                *guard = None;
            }
            result
        } else {
            let mut conn = self.connect().await?;
            conn.get(&key).await
        };

        match result {
            Ok(bytes) => Ok(non_empty(String::from_utf8_lossy(&bytes).into_owned())),
            // A cache miss is not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Backend(format!("memcached get error: {e}"))),
        }
    }

    async fn set(&self, key: &str, token: &str) -> Result<(), StorageError> {
        let result = if self.persistent {
            let mut guard = self.connection.lock().await;
            if guard.is_none() {
                *guard = Some(self.connect().await?);
            }
            let conn = guard.as_mut().expect("connection just established");
            let result = conn.set(&key, token.as_bytes(), self.key_ttl).await;
            if result.is_err() {
                *guard = None;
            }
            result
        } else {
            let mut conn = self.connect().await?;
            conn.set(&key, token.as_bytes(), self.key_ttl).await
        };

        result.map_err(|e| StorageError::Backend(format!("memcached set error: {e}")))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_one_hour() {
        let storage = MemcachedStorage::new("localhost", 11211);
        assert_eq!(storage.key_ttl, DEFAULT_KEY_TTL);
    }

    #[test]
    fn builder_overrides_apply() {
        let storage = MemcachedStorage::new("cache.internal", 11212)
            .key_ttl(60)
            .persistent(true);
        assert_eq!(storage.addr, "cache.internal:11212");
        assert_eq!(storage.key_ttl, 60);
        assert!(storage.persistent);
    }

    #[tokio::test]
    async fn unreachable_server_surfaces_backend_error() {
        // Port 9 (discard) is a safe dead endpoint on localhost.
        let storage = MemcachedStorage::new("127.0.0.1", 9);
        let err = storage.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
