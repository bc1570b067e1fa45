//! Tracked Cache - An instrumented key-value cache server
//!
//! Stores values under generated keys, records how often and with what
//! arguments the store operation was called, and serves web pages through
//! an expiring cache with per-URL access counters.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;
pub mod web;

pub use api::{create_router, AppState};
pub use cache::{replay, Cache, Conversion, Instrumented, OperationHandle, Scalar, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, SharedStore};
pub use tasks::spawn_cleanup_task;
pub use web::{Fetcher, HttpFetcher, PageCache};
