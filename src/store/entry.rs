//! Keyspace entries
//!
//! A value plus its optional deadline.

use std::time::{SystemTime, UNIX_EPOCH};

// == Entry Data ==
/// The value held under a key: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

impl EntryData {
    /// Short type name used in wrong-type error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryData::Bytes(_) => "string",
            EntryData::List(_) => "list",
        }
    }
}

// == Entry ==
#[derive(Debug, Clone)]
pub struct Entry {
    pub data: EntryData,
    /// Unix milliseconds after which the key behaves as absent
    pub expires_at: Option<u64>,
}

impl Entry {
    /// Creates an entry that expires `ttl_seconds` from now, or never.
    pub fn new(data: EntryData, ttl_seconds: Option<u64>) -> Self {
        let expires_at =
            ttl_seconds.map(|ttl| current_timestamp_ms().saturating_add(ttl.saturating_mul(1000)));
        Self { data, expires_at }
    }

    /// True once the deadline has been reached.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| current_timestamp_ms() >= deadline)
    }
}

/// Current Unix time in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
