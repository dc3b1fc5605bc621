use crate::error::CoreError;
use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A shortened URL and its click accounting.
///
/// `short_code` and `original_url` never change once the record is
/// persisted. Only `clicks` and `updated_at` move, and `clicks` only
/// moves upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    /// Identifier assigned by the backend; `0` until persisted.
    pub id: i64,
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    pub clicks: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UrlRecord {
    /// Builds an unpersisted record with zero clicks.
    ///
    /// Returns [`CoreError::InvalidInput`] when the URL is empty.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Result<Self, CoreError> {
        let original_url = original_url.into();
        if short_code.as_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "short code cannot be empty".to_string(),
            ));
        }
        if original_url.is_empty() {
            return Err(CoreError::InvalidInput("url cannot be empty".to_string()));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: 0,
            short_code,
            original_url,
            clicks: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns `true` once a backend has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
