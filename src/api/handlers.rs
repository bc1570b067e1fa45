//! API Handlers
//!
//! HTTP request handlers for each tracked cache endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{replay, Cache, STORE_OPERATION};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    GetQuery, GetResponse, HealthResponse, PageQuery, PageResponse, ReplayResponse, StatsResponse,
    StoreRequest, StoreResponse,
};
use crate::store::MemoryStore;
use crate::web::{Fetcher, HttpFetcher, PageCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, kept for stats and the expiry sweep
    pub store: MemoryStore,
    /// Instrumented cache service
    pub cache: Arc<Cache>,
    /// Expiring page cache
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Creates a new AppState over `store`.
    ///
    /// Builds the [`Cache`], which flushes the store.
    pub async fn new(store: MemoryStore, fetcher: Arc<dyn Fetcher>, page_ttl: u64) -> Result<Self> {
        let cache = Cache::new(Arc::new(store.clone())).await?;
        let pages = PageCache::new(Arc::new(store.clone()), fetcher).with_ttl(page_ttl);

        Ok(Self {
            store,
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        })
    }

    /// Creates a new AppState from configuration, fetching pages over HTTP.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;
        Self::new(MemoryStore::new(), Arc::new(fetcher), config.page_ttl).await
    }
}

/// Handler for POST /store
///
/// Stores a value under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Reads a value, converted per the `as` query parameter.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key, query.conversion).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay/:operation
///
/// Returns the call count and history of an instrumented operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let handle = match operation.as_str() {
        "store" | STORE_OPERATION => state.cache.store_handle(),
        _ => {
            return Err(CacheError::NotFound(format!(
                "No instrumented operation named '{}'",
                operation
            )))
        }
    };

    match replay(Some(&handle)).await? {
        Some(report) => Ok(Json(report.into())),
        None => Err(CacheError::Unavailable(
            "Call history store is not connected".to_string(),
        )),
    }
}

/// Handler for GET /page
///
/// Returns a page through the expiring page cache.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.get_page(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /stats
///
/// Returns current keyspace statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.store.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
