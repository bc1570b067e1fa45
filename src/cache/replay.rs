//! Call history replay
//!
//! Reads back the telemetry recorded by [`Instrumented`](crate::cache::Instrumented)
//! for one operation and renders it.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::cache::instrument::{inputs_key, outputs_key};
use crate::cache::scalar::{decode_int, decode_text};
use crate::error::Result;
use crate::store::SharedStore;

// == Operation Handle ==
/// Reference to an instrumented operation: its owner, its qualified name and
/// the store its telemetry lives in.
#[derive(Clone)]
pub struct OperationHandle {
    owner_id: Option<Uuid>,
    name: String,
    store: Option<SharedStore>,
}

impl OperationHandle {
    pub fn new(owner_id: Option<Uuid>, name: impl Into<String>, store: Option<SharedStore>) -> Self {
        Self {
            owner_id,
            name: name.into(),
            store,
        }
    }

    /// A handle with no owning instance. Replaying it does nothing.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self::new(None, name, None)
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("owner_id", &self.owner_id)
            .field("name", &self.name)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

// == Call Replay ==
/// One recorded call: rendered input and raw output.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEntry {
    pub input: String,
    pub output: Vec<u8>,
}

impl ReplayEntry {
    /// Output as text, with invalid UTF-8 replaced.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Recorded history of an operation.
///
/// `entries` pairs inputs with outputs by position and stops at the shorter
/// list, so `entries.len()` can be below `calls` after a failed call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallReplay {
    pub operation: String,
    pub calls: i64,
    pub entries: Vec<ReplayEntry>,
}

impl fmt::Display for CallReplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.calls)?;
        for entry in &self.entries {
            writeln!(
                f,
                "{}(*{}) -> b\"{}\"",
                self.operation,
                entry.input,
                entry.output.escape_ascii()
            )?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the call count and history of the operation behind `handle`.
///
/// Returns `Ok(None)` without touching the store when the handle is missing,
/// has no owner, or its store is absent or disconnected.
pub async fn replay(handle: Option<&OperationHandle>) -> Result<Option<CallReplay>> {
    let Some(handle) = handle else {
        return Ok(None);
    };
    if handle.owner_id.is_none() {
        debug!(operation = %handle.name, "Unbound operation, nothing to replay");
        return Ok(None);
    }
    let Some(store) = handle.store.as_deref().filter(|store| store.is_connected()) else {
        debug!(operation = %handle.name, "Store unavailable, nothing to replay");
        return Ok(None);
    };

    let name = handle.name.as_str();
    let calls = match store.get(name).await? {
        Some(raw) => decode_int(&raw)?,
        None => 0,
    };

    let inputs = store.lrange(&inputs_key(name), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(name), 0, -1).await?;

    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| {
            Ok(ReplayEntry {
                input: decode_text(input)?,
                output,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(CallReplay {
        operation: name.to_string(),
        calls,
        entries,
    }))
}

/// Prints the replay of `handle` to stdout; prints nothing when there is
/// nothing to replay.
pub async fn print_replay(handle: Option<&OperationHandle>) -> Result<()> {
    if let Some(report) = replay(handle).await? {
        print!("{}", report);
    }
    Ok(())
}
