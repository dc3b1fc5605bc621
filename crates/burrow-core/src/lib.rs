//! Core types and traits for the burrow URL shortener.
//!
//! This crate provides the entity model and the storage and cache
//! contracts shared by every backend and by the shortener service.

pub mod cache;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, StorageError};
pub use record::UrlRecord;
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
