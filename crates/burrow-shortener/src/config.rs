use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 5;

/// Settings for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Prefix of every short URL, e.g. `https://bur.row`.
    #[builder(setter(into))]
    pub base_url: String,
    /// Lifetime of cache entries written by the service.
    #[builder(default = DEFAULT_CACHE_TTL)]
    pub cache_ttl: Duration,
    /// Deadline applied to each individual repository or cache call.
    #[builder(default = DEFAULT_OPERATION_TIMEOUT)]
    pub operation_timeout: Duration,
    /// How many generated codes to try before giving up on a collision.
    #[builder(default = DEFAULT_MAX_GENERATION_ATTEMPTS)]
    pub max_generation_attempts: u32,
}
