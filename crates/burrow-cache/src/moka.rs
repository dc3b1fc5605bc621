use async_trait::async_trait;
use burrow_core::cache::Result;
use burrow_core::{CacheError, ShortCode, UrlCache, UrlRecord};
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    record: UrlRecord,
    ttl: Duration,
}

/// Expires each entry after the ttl it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-memory cache implementation using Moka.
///
/// Suited to single-node deployments. Entries are bounded by capacity and
/// expire after the ttl passed to [`UrlCache::set_url`].
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, Entry>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching URL record from Moka cache");

        match self.cache.get(code.as_str()).await {
            Some(entry) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(entry.record))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, record: &UrlRecord, ttl: Duration) -> Result<()> {
        let code = &record.short_code;
        if ttl.is_zero() {
            return Err(CacheError::Operation(format!(
                "refusing to cache '{code}' with a zero ttl"
            )));
        }

        trace!(code = %code, "Storing URL record in Moka cache");
        let entry = Entry {
            record: record.clone(),
            ttl,
        };
        self.cache.insert(code.as_str().to_string(), entry).await;
        debug!(code = %code, "Cached record in Moka");
        Ok(())
    }

    async fn del(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "Removing URL record from Moka cache");
        self.cache.invalidate(code.as_str()).await;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(c: &str, url: &str) -> UrlRecord {
        UrlRecord::new(code(c), url).unwrap()
    }

    #[tokio::test]
    async fn cache_get_and_set() {
        let cache = MokaUrlCache::new();
        let record = record("abc123", "https://example.com");

        assert!(cache.get_url(&code("abc123")).await.unwrap().is_none());

        cache.set_url(&record, TTL).await.unwrap();

        let result = cache.get_url(&code("abc123")).await.unwrap();
        assert_eq!(result, Some(record));
    }

    #[tokio::test]
    async fn cache_overwrites_existing_entry() {
        let cache = MokaUrlCache::new();

        cache
            .set_url(&record("abc123", "https://old.example"), TTL)
            .await
            .unwrap();
        cache
            .set_url(&record("abc123", "https://new.example"), TTL)
            .await
            .unwrap();

        let result = cache.get_url(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://new.example");
    }

    #[tokio::test]
    async fn cache_del_is_idempotent() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");

        cache
            .set_url(&record("abc123", "https://example.com"), TTL)
            .await
            .unwrap();
        cache.del(&c).await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_none());

        cache.del(&c).await.unwrap();
    }

    #[tokio::test]
    async fn entries_expire_after_their_own_ttl() {
        let cache = MokaUrlCache::new();

        cache
            .set_url(&record("short1", "https://a.example"), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_url(&record("long12", "https://b.example"), TTL)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get_url(&code("short1")).await.unwrap().is_none());
        assert!(cache.get_url(&code("long12")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn zero_ttl_is_rejected() {
        let cache = MokaUrlCache::new();

        let err = cache
            .set_url(&record("abc123", "https://example.com"), Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::Operation(_)));
        assert!(cache.get_url(&code("abc123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ping_always_succeeds() {
        MokaUrlCache::with_capacity(1).ping().await.unwrap();
    }
}
