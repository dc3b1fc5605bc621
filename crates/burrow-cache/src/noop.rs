use async_trait::async_trait;
use burrow_core::cache::Result;
use burrow_core::{ShortCode, UrlCache, UrlRecord};
use std::time::Duration;

/// A cache that stores nothing. Every lookup misses and every write
/// succeeds.
///
/// Used when caching is disabled, or when the configured cache backend
/// could not be reached at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl UrlCache for NoopCache {
    async fn get_url(&self, _code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(None)
    }

    async fn set_url(&self, _record: &UrlRecord, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn del(&self, _code: &ShortCode) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
