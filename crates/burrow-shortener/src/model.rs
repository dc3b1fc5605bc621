use burrow_core::UrlRecord;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Input of [`ShortenerService::create_short_url`](crate::ShortenerService::create_short_url).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
}

impl CreateUrlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_alias: None,
        }
    }

    pub fn with_alias(url: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_alias: Some(alias.into()),
        }
    }
}

/// Public view of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UrlResponse {
    pub fn from_record(record: &UrlRecord, base_url: &str) -> Self {
        Self {
            id: record.id,
            short_url: record.short_code.to_url(base_url),
            short_code: record.short_code.to_string(),
            original_url: record.original_url.clone(),
            clicks: record.clicks,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    Up,
    Degraded,
}

/// Outcome of a successful readiness probe. The repository is always up
/// when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub cache: CacheHealth,
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::ShortCode;

    #[test]
    fn request_uses_camel_case_alias() {
        let request: CreateUrlRequest =
            serde_json::from_str(r#"{"url":"https://example.com","customAlias":"myalias"}"#)
                .unwrap();
        assert_eq!(
            request,
            CreateUrlRequest::with_alias("https://example.com", "myalias")
        );

        let request: CreateUrlRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, CreateUrlRequest::default());
    }

    #[test]
    fn response_joins_base_url_and_code() {
        let record =
            UrlRecord::new(ShortCode::new_unchecked("abc123"), "https://example.com").unwrap();

        let response = UrlResponse::from_record(&record, "http://localhost:8080/");
        assert_eq!(response.short_url, "http://localhost:8080/abc123");

        let json = serde_json::to_value(&response).unwrap();
        let keys = [
            "id",
            "shortUrl",
            "shortCode",
            "originalUrl",
            "clicks",
            "createdAt",
            "updatedAt",
        ];
        for key in keys {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
