//! Keyspace Module
//!
//! Synchronous keyspace engine: byte-string and list values with lazy TTL
//! expiration, following Redis command semantics.

use std::collections::HashMap;

use crate::error::{CacheError, Result};
use crate::store::{Entry, EntryData, StoreStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Keyspace ==
/// Key-value storage holding byte strings and lists with optional TTLs.
#[derive(Debug, Default)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, Entry>,
    /// Performance statistics
    stats: StoreStats,
}

impl Keyspace {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a byte string, replacing any previous value and clearing its TTL.
    pub fn set(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.insert(key, EntryData::Bytes(value), None)
    }

    // == Set With Expiry ==
    /// Stores a byte string that expires `ttl_seconds` from now.
    pub fn setex(&mut self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidRequest(
                "Expire time must be positive".to_string(),
            ));
        }
        self.insert(key, EntryData::Bytes(value), Some(ttl_seconds))
    }

    // == Get ==
    /// Retrieves a byte string.
    ///
    /// Absent and expired keys yield `None` and count as misses.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = match self.live(key) {
            Some(Entry {
                data: EntryData::Bytes(raw),
                ..
            }) => Some(raw.clone()),
            Some(entry) => return Err(wrong_type(key, &entry.data)),
            None => None,
        };

        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(value)
    }

    // == Increment ==
    /// Increments the integer stored at `key` by one and returns the new value.
    ///
    /// A missing key counts from zero. An existing TTL is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        validate_key(key)?;

        match self.live(key) {
            Some(entry) => match &mut entry.data {
                EntryData::Bytes(raw) => {
                    let next = parse_counter(raw)?
                        .checked_add(1)
                        .ok_or_else(|| {
                            CacheError::WrongType("Increment would overflow".to_string())
                        })?;
                    *raw = next.to_string().into_bytes();
                    Ok(next)
                }
                other => Err(wrong_type(key, other)),
            },
            None => {
                self.entries
                    .insert(key.to_string(), Entry::new(EntryData::Bytes(b"1".to_vec()), None));
                self.stats.set_total_keys(self.entries.len());
                Ok(1)
            }
        }
    }

    // == Right Push ==
    /// Appends `value` to the list at `key`, creating it if needed.
    ///
    /// Returns the list length after the push.
    pub fn rpush(&mut self, key: &str, value: Vec<u8>) -> Result<usize> {
        validate_key(key)?;

        match self.live(key) {
            Some(entry) => match &mut entry.data {
                EntryData::List(items) => {
                    items.push(value);
                    Ok(items.len())
                }
                other => Err(wrong_type(key, other)),
            },
            None => {
                self.entries
                    .insert(key.to_string(), Entry::new(EntryData::List(vec![value]), None));
                self.stats.set_total_keys(self.entries.len());
                Ok(1)
            }
        }
    }

    // == List Range ==
    /// Returns the elements between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end of the list (`-1` is the last
    /// element). Out-of-range indices are clamped; a missing key is an empty list.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        match self.live(key) {
            Some(entry) => match &entry.data {
                EntryData::List(items) => Ok(list_range(items, start, stop).to_vec()),
                other => Err(wrong_type(key, other)),
            },
            None => Ok(Vec::new()),
        }
    }

    // == Exists ==
    /// Returns true if `key` holds a live (non-expired) value.
    pub fn exists(&mut self, key: &str) -> bool {
        self.live(key).is_some()
    }

    // == Flush ==
    /// Removes every key. Returns the number of keys removed.
    pub fn flush_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_keys(0);
        count
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let count = before - self.entries.len();

        self.stats.record_expired(count);
        self.stats.set_total_keys(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current keyspace statistics.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_keys(self.entries.len());
        stats
    }

    /// Returns the number of stored keys, including expired keys not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, data: EntryData, ttl_seconds: Option<u64>) -> Result<()> {
        validate_key(key)?;
        if let EntryData::Bytes(raw) = &data {
            validate_value(raw)?;
        }

        self.entries
            .insert(key.to_string(), Entry::new(data, ttl_seconds));
        self.stats.set_total_keys(self.entries.len());
        Ok(())
    }

    /// Looks up a key, dropping it first if its TTL has elapsed.
    fn live(&mut self, key: &str) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(Entry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_keys(self.entries.len());
        }
        self.entries.get_mut(key)
    }
}

// == Helpers ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

fn validate_value(value: &[u8]) -> Result<()> {
    if value.len() > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    Ok(())
}

fn wrong_type(key: &str, found: &EntryData) -> CacheError {
    CacheError::WrongType(format!("Key '{}' holds a {} value", key, found.kind()))
}

fn parse_counter(raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| CacheError::WrongType("Value is not an integer".to_string()))
}

fn list_range(items: &[Vec<u8>], start: i64, stop: i64) -> &[Vec<u8>] {
    let len = items.len() as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return &[];
    }
    &items[start as usize..=stop as usize]
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn list_of(keyspace: &mut Keyspace, key: &str, start: i64, stop: i64) -> Vec<String> {
        keyspace
            .lrange(key, start, stop)
            .unwrap()
            .into_iter()
            .map(|item| String::from_utf8(item).unwrap())
            .collect()
    }

    #[test]
    fn test_keyspace_new() {
        let keyspace = Keyspace::new();
        assert_eq!(keyspace.len(), 0);
        assert!(keyspace.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut keyspace = Keyspace::new();

        keyspace.set("key1", b"value1".to_vec()).unwrap();

        assert_eq!(keyspace.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(keyspace.len(), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let mut keyspace = Keyspace::new();
        assert_eq!(keyspace.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let mut keyspace = Keyspace::new();

        keyspace.set("key1", b"value1".to_vec()).unwrap();
        keyspace.set("key1", b"value2".to_vec()).unwrap();

        assert_eq!(keyspace.get("key1").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(keyspace.len(), 1);
    }

    #[test]
    fn test_setex_expiration() {
        let mut keyspace = Keyspace::new();

        keyspace.setex("key1", 1, b"value1".to_vec()).unwrap();
        assert!(keyspace.exists("key1"));

        sleep(Duration::from_millis(1100));

        assert_eq!(keyspace.get("key1").unwrap(), None);
        assert!(!keyspace.exists("key1"));
        assert_eq!(keyspace.stats().expired, 1);
    }

    #[test]
    fn test_setex_zero_ttl_rejected() {
        let mut keyspace = Keyspace::new();

        let result = keyspace.setex("key1", 0, b"value".to_vec());
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_set_clears_ttl() {
        let mut keyspace = Keyspace::new();

        keyspace.setex("key1", 1, b"old".to_vec()).unwrap();
        keyspace.set("key1", b"new".to_vec()).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(keyspace.get("key1").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_incr_missing_starts_at_one() {
        let mut keyspace = Keyspace::new();

        assert_eq!(keyspace.incr("counter").unwrap(), 1);
        assert_eq!(keyspace.incr("counter").unwrap(), 2);
        assert_eq!(keyspace.get("counter").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_incr_existing_integer() {
        let mut keyspace = Keyspace::new();

        keyspace.set("counter", b"41".to_vec()).unwrap();
        assert_eq!(keyspace.incr("counter").unwrap(), 42);
    }

    #[test]
    fn test_incr_non_integer_fails() {
        let mut keyspace = Keyspace::new();

        keyspace.set("text", b"abc".to_vec()).unwrap();
        assert!(matches!(keyspace.incr("text"), Err(CacheError::WrongType(_))));
    }

    #[test]
    fn test_incr_overflow_fails() {
        let mut keyspace = Keyspace::new();

        keyspace.set("counter", i64::MAX.to_string().into_bytes()).unwrap();
        assert!(matches!(keyspace.incr("counter"), Err(CacheError::WrongType(_))));
    }

    #[test]
    fn test_rpush_and_lrange() {
        let mut keyspace = Keyspace::new();

        assert_eq!(keyspace.rpush("list", b"a".to_vec()).unwrap(), 1);
        assert_eq!(keyspace.rpush("list", b"b".to_vec()).unwrap(), 2);
        assert_eq!(keyspace.rpush("list", b"c".to_vec()).unwrap(), 3);

        assert_eq!(list_of(&mut keyspace, "list", 0, -1), ["a", "b", "c"]);
        assert_eq!(list_of(&mut keyspace, "list", 1, 1), ["b"]);
        assert_eq!(list_of(&mut keyspace, "list", -2, -1), ["b", "c"]);
        assert_eq!(list_of(&mut keyspace, "list", 0, 100), ["a", "b", "c"]);
        assert_eq!(list_of(&mut keyspace, "list", -100, 0), ["a"]);
        assert!(list_of(&mut keyspace, "list", 2, 1).is_empty());
        assert!(list_of(&mut keyspace, "list", 5, 10).is_empty());
    }

    #[test]
    fn test_lrange_missing_key_is_empty() {
        let mut keyspace = Keyspace::new();
        assert!(keyspace.lrange("missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_errors() {
        let mut keyspace = Keyspace::new();

        keyspace.set("string", b"x".to_vec()).unwrap();
        keyspace.rpush("list", b"y".to_vec()).unwrap();

        assert!(matches!(
            keyspace.rpush("string", b"z".to_vec()),
            Err(CacheError::WrongType(_))
        ));
        assert!(matches!(
            keyspace.lrange("string", 0, -1),
            Err(CacheError::WrongType(_))
        ));
        assert!(matches!(keyspace.get("list"), Err(CacheError::WrongType(_))));
        assert!(matches!(keyspace.incr("list"), Err(CacheError::WrongType(_))));
    }

    #[test]
    fn test_flush_all() {
        let mut keyspace = Keyspace::new();

        keyspace.set("a", b"1".to_vec()).unwrap();
        keyspace.rpush("b", b"2".to_vec()).unwrap();
        keyspace.incr("c").unwrap();

        assert_eq!(keyspace.flush_all(), 3);
        assert!(keyspace.is_empty());
        assert!(!keyspace.exists("a"));
    }

    #[test]
    fn test_purge_expired() {
        let mut keyspace = Keyspace::new();

        keyspace.setex("key1", 1, b"value1".to_vec()).unwrap();
        keyspace.setex("key2", 10, b"value2".to_vec()).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(keyspace.purge_expired(), 1);
        assert_eq!(keyspace.len(), 1);
        assert!(keyspace.exists("key2"));
    }

    #[test]
    fn test_stats() {
        let mut keyspace = Keyspace::new();

        keyspace.set("key1", b"value1".to_vec()).unwrap();
        keyspace.get("key1").unwrap(); // hit
        keyspace.get("nonexistent").unwrap(); // miss

        let stats = keyspace.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_keys, 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut keyspace = Keyspace::new();

        assert!(matches!(
            keyspace.set("", b"value".to_vec()),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_long_keys_accepted() {
        let mut keyspace = Keyspace::new();
        let long_key = format!("count:http://example.com/{}", "a".repeat(4096));

        keyspace.set(&long_key, b"value".to_vec()).unwrap();
        assert_eq!(keyspace.incr(&format!("{}:n", long_key)).unwrap(), 1);
        assert_eq!(keyspace.get(&long_key).unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_list_elements_not_size_capped() {
        let mut keyspace = Keyspace::new();
        let escaped = "\\xff".repeat(3 * 1024 * 1024).into_bytes();

        assert_eq!(keyspace.rpush("inputs", escaped.clone()).unwrap(), 1);
        assert_eq!(keyspace.lrange("inputs", 0, -1).unwrap(), vec![escaped]);
    }
}
