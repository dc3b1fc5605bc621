use std::time::Duration;

use burrow_cache::{CacheError, RedisUrlCache, UrlCache};
use burrow_core::{ShortCode, UrlRecord};
use burrow_test_infra::redis::RedisServer;
use redis::AsyncCommands;

/// Test fixture that manages a Redis container using test-infra.
pub struct RedisTestContainer {
    #[allow(dead_code)]
    redis: RedisServer,
    redis_url: String,
}

impl RedisTestContainer {
    pub async fn start() -> Self {
        let redis = RedisServer::new().await.expect("Failed to start Redis");
        let redis_url = redis.url().await.expect("Failed to get Redis url");

        // Wait a moment to ensure Redis is fully ready
        tokio::time::sleep(Duration::from_millis(500)).await;

        Self { redis, redis_url }
    }

    pub async fn create_connection(&self) -> redis::aio::MultiplexedConnection {
        let client =
            redis::Client::open(self.redis_url.as_str()).expect("Failed to create Redis client");
        client
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to get Redis connection")
    }
}

fn create_test_record(code: &str, url: &str) -> UrlRecord {
    UrlRecord::new(ShortCode::new(code).unwrap(), url).unwrap()
}

const TTL: Duration = Duration::from_secs(60);

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_basic_get_set() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::connect(&fixture.redis_url).await.unwrap();

    let record = create_test_record("test123", "https://example.com");

    let result = cache.get_url(&record.short_code).await.unwrap();
    assert!(result.is_none(), "Cache should be empty initially");

    cache.set_url(&record, TTL).await.unwrap();

    let cached = cache.get_url(&record.short_code).await.unwrap();
    assert_eq!(cached, Some(record));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_uses_url_prefix_and_expiry() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::new(fixture.create_connection().await);
    let mut raw = fixture.create_connection().await;

    let record = create_test_record("abc123", "https://example.com");
    cache.set_url(&record, TTL).await.unwrap();

    let stored: Option<String> = raw.get("url:abc123").await.unwrap();
    assert!(stored.is_some(), "Record should be stored under url:<code>");

    let pttl: i64 = raw.pttl("url:abc123").await.unwrap();
    assert!(pttl > 0 && pttl <= 60_000, "unexpected pttl {pttl}");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_entry_expires() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::new(fixture.create_connection().await);

    let record = create_test_record("ttltest", "https://example.com/ttl");
    cache
        .set_url(&record, Duration::from_millis(200))
        .await
        .unwrap();
    assert!(cache.get_url(&record.short_code).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let result = cache.get_url(&record.short_code).await.unwrap();
    assert!(result.is_none(), "Key should be expired after TTL");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_delete() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::new(fixture.create_connection().await);

    let record = create_test_record("delete123", "https://example.com/delete");
    cache.set_url(&record, TTL).await.unwrap();
    assert!(cache.get_url(&record.short_code).await.unwrap().is_some());

    cache.del(&record.short_code).await.unwrap();
    assert!(cache.get_url(&record.short_code).await.unwrap().is_none());

    // Deleting a missing key is not an error
    cache.del(&record.short_code).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_custom_prefix() {
    let fixture = RedisTestContainer::start().await;
    let cache1 = RedisUrlCache::with_prefix(fixture.create_connection().await, "prefix1:");
    let cache2 = RedisUrlCache::with_prefix(fixture.create_connection().await, "prefix2:");

    let record = create_test_record("prefixtest", "https://example.com/prefix");
    cache1.set_url(&record, TTL).await.unwrap();

    assert!(cache1.get_url(&record.short_code).await.unwrap().is_some());
    assert!(
        cache2.get_url(&record.short_code).await.unwrap().is_none(),
        "Different prefix should isolate caches"
    );
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_corrupt_value_is_invalid_data() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::new(fixture.create_connection().await);
    let mut raw = fixture.create_connection().await;

    raw.set::<_, _, ()>("url:broken", "not json").await.unwrap();

    let err = cache
        .get_url(&ShortCode::new("broken").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::InvalidData(_)));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_redis_cache_zero_ttl_is_rejected() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisUrlCache::new(fixture.create_connection().await);

    let record = create_test_record("zerottl", "https://example.com");
    let err = cache.set_url(&record, Duration::ZERO).await.unwrap_err();

    assert!(matches!(err, CacheError::Operation(_)));
    cache.ping().await.unwrap();
}
