use burrow_shortener::{CacheHealth, ValidationErrors};
use jiff::Timestamp;
use serde::Serialize;

pub use burrow_shortener::{CreateUrlRequest, UrlResponse};

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Body of every non-validation error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
    pub timestamp: Timestamp,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
            timestamp: Timestamp::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: &'static str,
    pub details: ValidationErrors,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub cache: CacheHealth,
    pub timestamp: Timestamp,
}
