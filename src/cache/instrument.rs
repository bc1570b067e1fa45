//! Call instrumentation
//!
//! Counts calls and records their inputs and outputs in the key-value store
//! without changing the wrapped operation's result.
//!
//! Telemetry keys for an operation named `N`:
//! - `N` - call counter
//! - `N:inputs` - list of rendered argument tuples
//! - `N:outputs` - list of raw results
//!
//! Telemetry is fail-open: a missing or disconnected store, or a failed
//! telemetry write, never fails the wrapped call.

use std::fmt;
use std::future::Future;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::OperationHandle;
use crate::error::Result;
use crate::store::{KeyValueStore, SharedStore};

/// Key of the list holding recorded inputs for `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// Key of the list holding recorded outputs for `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

// == Hook ==
/// Telemetry attached around an instrumented call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Increments the call counter before the call
    CallCount,
    /// Appends the input before the call and the output after it
    CallHistory,
}

impl Hook {
    async fn before(self, store: &dyn KeyValueStore, name: &str, input: &str) {
        let result = match self {
            Hook::CallCount => store.incr(name).await.map(drop),
            Hook::CallHistory => store
                .rpush(&inputs_key(name), input.as_bytes().to_vec())
                .await
                .map(drop),
        };

        if let Err(e) = result {
            warn!(operation = name, hook = ?self, "Pre-call telemetry failed: {}", e);
        }
    }

    async fn after(self, store: &dyn KeyValueStore, name: &str, output: &[u8]) {
        let result = match self {
            Hook::CallCount => Ok(()),
            Hook::CallHistory => store
                .rpush(&outputs_key(name), output.to_vec())
                .await
                .map(drop),
        };

        if let Err(e) = result {
            warn!(operation = name, hook = ?self, "Post-call telemetry failed: {}", e);
        }
    }
}

// == Instrumented ==
/// An operation name plus the ordered hooks run around each of its calls.
///
/// The first hook is the outermost wrapper: pre-call hooks run in list order,
/// post-call hooks in reverse order. With `[CallHistory, CallCount]` a call
/// goes: append input, increment counter, run, append output.
///
/// If the operation fails, post-call hooks are skipped while the pre-call
/// writes stay committed. Under concurrent calls the counter and history
/// lists are not updated atomically with respect to each other.
pub struct Instrumented {
    name: String,
    hooks: Vec<Hook>,
    store: Option<SharedStore>,
}

impl Instrumented {
    /// Creates an instrumented operation with no hooks.
    ///
    /// With `store` set to `None` every hook is a no-op.
    pub fn new(name: impl Into<String>, store: Option<SharedStore>) -> Self {
        Self {
            name: name.into(),
            hooks: Vec::new(),
            store,
        }
    }

    /// Adds `hook` inside the hooks added so far.
    pub fn with_hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hooks in wrapping order, outermost first.
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// Returns a handle to this operation owned by `owner_id`, for replay.
    pub fn handle(&self, owner_id: Uuid) -> OperationHandle {
        OperationHandle::new(Some(owner_id), self.name.clone(), self.store.clone())
    }

    // == Call ==
    /// Runs `operation` with the configured hooks around it.
    ///
    /// `input` is the rendered argument tuple recorded by [`Hook::CallHistory`].
    /// The operation's result is returned unchanged.
    pub async fn call<T, F, Fut>(&self, input: String, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        T: AsRef<[u8]>,
    {
        if let Some(store) = self.telemetry_store() {
            for hook in &self.hooks {
                hook.before(store, &self.name, &input).await;
            }
        } else {
            debug!(operation = %self.name, "Store unavailable, skipping pre-call telemetry");
        }

        let output = operation().await?;

        if let Some(store) = self.telemetry_store() {
            for hook in self.hooks.iter().rev() {
                hook.after(store, &self.name, output.as_ref()).await;
            }
        }

        Ok(output)
    }

    fn telemetry_store(&self) -> Option<&dyn KeyValueStore> {
        self.store
            .as_deref()
            .filter(|store| store.is_connected())
    }
}

impl fmt::Debug for Instrumented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}
