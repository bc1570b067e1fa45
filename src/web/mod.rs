//! Web Module
//!
//! Expiring page cache and the fetchers it reads through.

mod fetcher;
mod page_cache;

pub use fetcher::{Fetcher, HttpFetcher};
pub use page_cache::{cached_key, count_key, PageCache, DEFAULT_PAGE_TTL};
