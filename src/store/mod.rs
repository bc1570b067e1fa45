//! Store Module
//!
//! The key-value store collaborator used by the cache layer, and an
//! in-memory implementation of it.

mod entry;
mod keyspace;
mod memory;
mod stats;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::{current_timestamp_ms, Entry, EntryData};
pub use keyspace::Keyspace;
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Public Constants ==
/// Maximum allowed key length in bytes, the Redis string bound
pub const MAX_KEY_LENGTH: usize = 512 * 1024 * 1024; // 512 MiB

/// Maximum allowed byte-string value size; list elements are not capped
pub const MAX_VALUE_SIZE: usize = 512 * 1024 * 1024; // 512 MiB

// == Key Value Store ==
/// Redis-style key-value store.
///
/// Values are byte strings or lists of byte strings. Every method is a single
/// round-trip; implementations serialise operations on the same key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// False when the handle cannot serve commands.
    fn is_connected(&self) -> bool {
        true
    }

    /// Stores `value` under `key`, clearing any TTL.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Returns the byte string at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Increments the integer at `key` (missing counts as 0) and returns it.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends to the list at `key`, returning the new length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns list elements from `start` to `stop` inclusive; negative
    /// indices count from the end.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    async fn setex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Removes every key in the store.
    async fn flush_all(&self) -> Result<()>;
}

/// Shared handle to a store, injected into every component that needs one.
pub type SharedStore = Arc<dyn KeyValueStore>;
