//! Cache Service Module
//!
//! Stores scalar values under generated keys and reads them back.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{render_args, Conversion, Hook, Instrumented, OperationHandle, Scalar, Value};
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

/// Qualified name under which `Cache::store` telemetry is recorded.
pub const STORE_OPERATION: &str = "Cache::store";

// == Cache ==
/// Key-value cache with instrumented writes.
///
/// Every [`store`](Cache::store) call is counted and its input and output are
/// recorded, in that order: append input, increment counter, write, append
/// output. Use [`store_handle`](Cache::store_handle) with
/// [`replay`](crate::cache::replay) to read the history back.
pub struct Cache {
    id: Uuid,
    store: SharedStore,
    store_call: Instrumented,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store` and **flushes every key in it**.
    ///
    /// A new cache always starts from an empty store. Constructing two caches
    /// concurrently against the same store, or constructing one while others
    /// read from it, races on that flush.
    pub async fn new(store: SharedStore) -> Result<Self> {
        store.flush_all().await?;

        let id = Uuid::new_v4();
        info!(cache_id = %id, "Cache initialized, store flushed");

        let store_call = Instrumented::new(STORE_OPERATION, Some(Arc::clone(&store)))
            .with_hook(Hook::CallHistory)
            .with_hook(Hook::CallCount);

        Ok(Self {
            id,
            store,
            store_call,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle to the instrumented store operation, for replay.
    pub fn store_handle(&self) -> OperationHandle {
        self.store_call.handle(self.id)
    }

    // == Store ==
    /// Writes `value` under a fresh random UUID key and returns the key.
    pub async fn store(&self, value: impl Into<Scalar>) -> Result<String> {
        let value = value.into();
        let input = render_args(std::slice::from_ref(&value));
        let store = Arc::clone(&self.store);

        self.store_call
            .call(input, move || async move {
                let key = Uuid::new_v4().to_string();
                store.set(&key, value.to_bytes()).await?;
                debug!(key = %key, "Stored value");
                Ok::<_, CacheError>(key)
            })
            .await
    }

    // == Get ==
    /// Reads the value at `key` and applies `conversion` to it.
    ///
    /// An absent key yields `None`; the conversion is not applied to it.
    pub async fn get(&self, key: &str, conversion: Conversion) -> Result<Option<Value>> {
        match self.store.get(key).await? {
            Some(raw) => conversion.apply(raw).map(Some),
            None => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Reads the raw bytes at `key`.
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key, Conversion::Raw).await?.and_then(Value::into_raw))
    }

    /// Reads the value at `key` as UTF-8 text.
    ///
    /// Fails with [`CacheError::Decode`](crate::error::CacheError::Decode) on
    /// invalid UTF-8.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key, Conversion::Text).await?.and_then(Value::into_text))
    }

    /// Reads the value at `key` as a base-10 integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.get(key, Conversion::Int).await?.and_then(Value::into_int))
    }

    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.get(key, Conversion::Float).await?.and_then(Value::into_float))
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("id", &self.id)
            .field("store_call", &self.store_call)
            .finish()
    }
}
