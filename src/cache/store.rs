//! Cache backends.
//!
//! [`CacheStore`] is the contract the client needs from a backend: async
//! `get`/`set` with an optional per-entry TTL, plus `delete` and `clear`.
//! Expiry is evaluated lazily by the backend at read time; an expired entry
//! simply reads as absent.
//!
//! [`MokaCacheStore`] is the default: an in-memory moka cache owned by the
//! client instance. Shared or persistent backends (redis, disk) implement
//! the same trait and are injected through the builder; keys produced by
//! [`CacheKeyBuilder`](super::CacheKeyBuilder) are stable across processes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use crate::Result;
use crate::types::ResponseEnvelope;

/// Key/value store for response envelopes.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch a stored envelope. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<ResponseEnvelope>>;

    /// Store (or overwrite) an envelope. `None` TTL means the backend default.
    async fn set(&self, key: &str, value: ResponseEnvelope, ttl: Option<Duration>) -> Result<()>;

    /// Remove one entry. Returns whether it was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;
}

/// Configuration for the in-memory cache.
///
/// ```rust
/// # use rapidapi_client::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .default_ttl(Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Lifetime for entries stored without a TTL. Default: unbounded.
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            default_ttl: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }
}

#[derive(Clone)]
struct CacheEntry {
    envelope: ResponseEnvelope,
    ttl: Option<Duration>,
}

/// Per-entry expiry: each entry carries its own TTL, reset on overwrite.
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-memory LRU store with per-entry TTL (moka).
pub struct MokaCacheStore {
    cache: Cache<String, CacheEntry>,
    default_ttl: Option<Duration>,
}

impl MokaCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(EntryExpiry)
            .build();
        Self {
            cache,
            default_ttl: config.default_ttl,
        }
    }

    /// Number of entries currently held (approximate until pending tasks run).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    fn name(&self) -> &str {
        "moka"
    }

    async fn get(&self, key: &str) -> Result<Option<ResponseEnvelope>> {
        Ok(self.cache.get(key).await.map(|entry| entry.envelope))
    }

    async fn set(&self, key: &str, value: ResponseEnvelope, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry {
            envelope: value,
            ttl: ttl.or(self.default_ttl),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CacheMetrics, RequestDescriptor, RequestMetadata};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn envelope(data: serde_json::Value) -> ResponseEnvelope {
        ResponseEnvelope {
            status: 200,
            data,
            headers: BTreeMap::new(),
            duration_ms: 1,
            request: RequestMetadata {
                descriptor: RequestDescriptor::get("/x"),
                base_url: "https://example.com".into(),
            },
            from_cache: false,
            cache_metrics: CacheMetrics::default(),
            rate_limit: None,
        }
    }

    #[test]
    fn cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.default_ttl, None);
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let store = MokaCacheStore::default();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", envelope(json!({"ok": true})), None).await.unwrap();
        let hit = store.get("k").await.unwrap().unwrap();
        assert_eq!(hit.data, json!({"ok": true}));
    }

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let store = MokaCacheStore::default();
        store
            .set("k", envelope(json!(1)), Some(Duration::from_millis(25)))
            .await
            .unwrap();
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ttl_is_per_entry() {
        let store = MokaCacheStore::default();
        store
            .set("short", envelope(json!(1)), Some(Duration::from_millis(25)))
            .await
            .unwrap();
        store.set("forever", envelope(json!(2)), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get("short").await.unwrap().is_none());
        assert!(store.get("forever").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn default_ttl_applies_when_unset() {
        let store = MokaCacheStore::new(&CacheConfig::new().default_ttl(Duration::from_millis(25)));
        store.set("k", envelope(json!(1)), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_value_and_ttl() {
        let store = MokaCacheStore::default();
        store
            .set("k", envelope(json!(1)), Some(Duration::from_millis(25)))
            .await
            .unwrap();
        store.set("k", envelope(json!(2)), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.get("k").await.unwrap().unwrap().data, json!(2));
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let store = MokaCacheStore::default();
        store.set("a", envelope(json!(1)), None).await.unwrap();
        store.set("b", envelope(json!(2)), None).await.unwrap();

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert!(store.get("a").await.unwrap().is_none());

        store.clear().await.unwrap();
        assert!(store.get("b").await.unwrap().is_none());
    }
}
