use crate::error::CacheError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for URL records.
///
/// This trait provides a domain-specific caching abstraction for [`UrlRecord`]s,
/// using [`ShortCode`] as the key. The cache is never authoritative: callers
/// must treat every error as a miss or a skipped write.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is absent or expired.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Store URL record in cache, keyed by its short code, for `ttl`.
    ///
    /// Overwrites any existing entry.
    async fn set_url(&self, record: &UrlRecord, ttl: Duration) -> Result<()>;

    /// Remove URL record from cache.
    ///
    /// It is not an error if the key does not exist.
    async fn del(&self, code: &ShortCode) -> Result<()>;

    /// Liveness probe for the cache backend.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<T: UrlCache + ?Sized> UrlCache for Arc<T> {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get_url(code).await
    }

    async fn set_url(&self, record: &UrlRecord, ttl: Duration) -> Result<()> {
        (**self).set_url(record, ttl).await
    }

    async fn del(&self, code: &ShortCode) -> Result<()> {
        (**self).del(code).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
