//! In-memory store
//!
//! Async [`KeyValueStore`] over a [`Keyspace`] shared behind `Arc<RwLock<>>`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, Keyspace, StoreStats};

// == Memory Store ==
/// Thread-safe in-memory key-value store.
///
/// Cloning yields another handle to the same keyspace.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    keyspace: Arc<RwLock<Keyspace>>,
    connected: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            keyspace: Arc::new(RwLock::new(Keyspace::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Marks every handle of this store as disconnected.
    ///
    /// Commands then fail with [`CacheError::Unavailable`].
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!("Memory store disconnected");
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Returns current keyspace statistics.
    pub async fn stats(&self) -> StoreStats {
        self.keyspace.read().await.stats()
    }

    /// Number of stored keys, including expired keys not yet purged.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }

    /// Removes expired keys, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.keyspace.write().await.purge_expired()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(CacheError::Unavailable(
                "Memory store is disconnected".to_string(),
            ))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.ensure_connected()?;
        self.keyspace.write().await.set(key, value)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_connected()?;
        // Write lock: reads drop expired keys and update stats
        self.keyspace.write().await.get(key)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.ensure_connected()?;
        self.keyspace.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.ensure_connected()?;
        self.keyspace.write().await.rpush(key, value)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.ensure_connected()?;
        self.keyspace.write().await.lrange(key, start, stop)
    }

    async fn setex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()> {
        self.ensure_connected()?;
        self.keyspace.write().await.setex(key, ttl_seconds, value)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.keyspace.write().await.exists(key))
    }

    async fn flush_all(&self) -> Result<()> {
        self.ensure_connected()?;
        let removed = self.keyspace.write().await.flush_all();
        debug!("Flushed {} keys", removed);
        Ok(())
    }
}
