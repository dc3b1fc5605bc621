//! Cache implementations for burrow.
//!
//! Every backend implements [`UrlCache`]. The cache is an accelerator only:
//! the shortener service treats any [`CacheError`] as a miss.

pub mod moka;
pub mod noop;
pub mod redis;

pub use burrow_core::cache::Result;
pub use burrow_core::{CacheError, UrlCache};
pub use self::moka::MokaUrlCache;
pub use noop::NoopCache;
pub use self::redis::RedisUrlCache;
