use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process memo cache.
///
/// Sits in front of the pick/standout storage so repeated same-day calls for
/// the same seeker skip the storage round trip. Entries expire on their own;
/// the storage layer remains the source of truth.
pub struct MemoCache {
    inner: moka::sync::Cache<String, Vec<u8>>,
}

impl MemoCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = moka::sync::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { inner }
    }

    /// Get a value from cache, or `None` on miss or a stale payload.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let bytes = self.inner.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::trace!("cache hit: {}", key);
                Some(value)
            }
            Err(err) => {
                // A payload that no longer deserializes is treated as a miss
                tracing::debug!("evicting undecodable cache entry {}: {}", key, err);
                self.inner.invalidate(key);
                None
            }
        }
    }

    /// Set a value in cache
    pub fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.inner.insert(key.to_string(), bytes);
        tracing::trace!("cache set: {}", key);
        Ok(())
    }

    pub fn invalidate(&self, key: &str) {
        self.inner.invalidate(key);
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoCache {
    /// One day of entries per active seeker is small; size generously.
    fn default() -> Self {
        Self::new(10_000, 24 * 60 * 60)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a daily pick
    pub fn daily_pick(seeker: Uuid, date: NaiveDate) -> String {
        format!("pick:{}:{}", seeker, date)
    }

    /// Build a cache key for a standouts batch
    pub fn standouts(seeker: Uuid, date: NaiveDate) -> String {
        format!("standouts:{}:{}", seeker, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        let cache = MemoCache::new(100, 60);

        cache.set("test_key", &"test_value").unwrap();
        let result: Option<String> = cache.get("test_key");
        assert_eq!(result.as_deref(), Some("test_value"));

        cache.invalidate("test_key");
        assert!(cache.get::<String>("test_key").is_none());
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = MemoCache::default();
        assert!(cache.get::<String>("absent").is_none());
    }

    #[test]
    fn test_cache_key_builder() {
        let seeker = Uuid::nil();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            CacheKey::daily_pick(seeker, date),
            format!("pick:{}:2024-06-15", seeker)
        );
        assert_eq!(
            CacheKey::standouts(seeker, date),
            format!("standouts:{}:2024-06-15", seeker)
        );
    }
}
