//! Expiring page cache
//!
//! Caches fetched pages for a fixed TTL and counts every access.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{decode_int, decode_text};
use crate::error::Result;
use crate::store::SharedStore;
use crate::web::Fetcher;

/// Seconds a fetched page stays cached.
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Key of the cached content for `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{}", url)
}

// == Page Cache ==
/// Read-through cache in front of a [`Fetcher`].
pub struct PageCache {
    store: SharedStore,
    fetcher: Arc<dyn Fetcher>,
    ttl: u64,
}

impl PageCache {
    pub fn new(store: SharedStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            ttl: DEFAULT_PAGE_TTL,
        }
    }

    /// Overrides the cache TTL in seconds. Zero keeps [`DEFAULT_PAGE_TTL`].
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl = if ttl_seconds == 0 {
            DEFAULT_PAGE_TTL
        } else {
            ttl_seconds
        };
        self
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    // == Get Page ==
    /// Returns the content at `url`, from cache while it is fresh.
    ///
    /// Every call increments the access counter for `url`, hit or miss. On a
    /// miss the page is fetched and cached for the TTL. Fetch failures are
    /// returned as is and nothing is cached.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        if let Err(e) = self.store.incr(&count_key(url)).await {
            warn!(url, "Failed to count page access: {}", e);
        }

        if let Some(raw) = self.store.get(&cached_key(url)).await? {
            debug!(url, "Page cache hit");
            return decode_text(raw);
        }

        debug!(url, "Page cache miss, fetching");
        let content = self.fetcher.fetch(url).await?;
        self.store
            .setex(&cached_key(url), self.ttl, content.as_bytes().to_vec())
            .await?;

        Ok(content)
    }

    /// Number of `get_page` calls made for `url`.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => decode_int(&raw),
            None => Ok(0),
        }
    }
}

impl fmt::Debug for PageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::CacheError;
    use crate::store::{KeyValueStore, MemoryStore};

    /// Serves a numbered page and counts how often it was asked.
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("<html>{} #{}</html>", url, call))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Err(CacheError::Fetch("connection refused".to_string()))
        }
    }

    fn page_cache(store: &MemoryStore, fetcher: Arc<dyn Fetcher>) -> PageCache {
        PageCache::new(Arc::new(store.clone()), fetcher)
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_is_cached() {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = page_cache(&store, fetcher.clone());

        let first = pages.get_page("http://x").await.unwrap();
        let second = pages.get_page("http://x").await.unwrap();

        assert_eq!(first, "<html>http://x #1</html>");
        assert_eq!(second, first);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pages.access_count("http://x").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetches_again_after_ttl() {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = page_cache(&store, fetcher.clone()).with_ttl(1);

        let first = pages.get_page("http://x").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = pages.get_page("http://x").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(pages.access_count("http://x").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_urls_are_cached_separately() {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = page_cache(&store, fetcher.clone());

        pages.get_page("http://a").await.unwrap();
        pages.get_page("http://b").await.unwrap();
        pages.get_page("http://a").await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(pages.access_count("http://a").await.unwrap(), 2);
        assert_eq!(pages.access_count("http://b").await.unwrap(), 1);
        assert_eq!(pages.access_count("http://never").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_is_not_cached() {
        let store = MemoryStore::new();
        let pages = page_cache(&store, Arc::new(FailingFetcher));

        let result = pages.get_page("http://down").await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert!(!store.exists(&cached_key("http://down")).await.unwrap());
        assert_eq!(pages.access_count("http://down").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_long_url_is_counted_and_cached() {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = page_cache(&store, fetcher.clone());
        let url = format!("http://example.com/?q={}", "a".repeat(1100));

        let first = pages.get_page(&url).await.unwrap();
        let second = pages.get_page(&url).await.unwrap();

        assert_eq!(first, format!("<html>{} #1</html>", url));
        assert_eq!(second, first);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pages.access_count(&url).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_keeps_default() {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = page_cache(&store, fetcher.clone()).with_ttl(0);

        assert_eq!(pages.ttl(), DEFAULT_PAGE_TTL);
        pages.get_page("http://x").await.unwrap();
        pages.get_page("http://x").await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_content_uses_setex_ttl() {
        let store = MemoryStore::new();
        let pages = page_cache(&store, Arc::new(CountingFetcher::default()));

        pages.get_page("http://x").await.unwrap();

        assert_eq!(pages.ttl(), DEFAULT_PAGE_TTL);
        assert!(store.exists(&cached_key("http://x")).await.unwrap());
        assert_eq!(store.get(&count_key("http://x")).await.unwrap(), Some(b"1".to_vec()));
    }
}
