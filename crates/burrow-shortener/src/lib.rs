//! URL shortener service implementation.
//!
//! [`ShortenerService`] allocates short codes, resolves them with a
//! read-through cache and keeps click counts. Storage, cache and code
//! generation are injected, so the same service runs over every backend.

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod validation;

pub use config::ShortenerConfig;
pub use error::{Result, ShortenerError};
pub use model::{CacheHealth, CreateUrlRequest, HealthReport, UrlResponse};
pub use service::ShortenerService;
pub use validation::{ValidatedRequest, ValidationErrors};
