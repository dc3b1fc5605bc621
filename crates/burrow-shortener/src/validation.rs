use burrow_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use burrow_core::ShortCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

pub const FIELD_URL: &str = "url";
pub const FIELD_CUSTOM_ALIAS: &str = "customAlias";

/// Field-level validation failures, keyed by request field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// A shorten request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// The URL to store. Safe to emit verbatim as a `Location` header.
    pub url: String,
    pub custom_alias: Option<ShortCode>,
}

/// Validates a shorten request.
///
/// An empty custom alias counts as absent. URLs containing control
/// characters or surrounding whitespace are rejected. A URL that is not
/// plain printable ASCII is stored in its parsed, percent-encoded form.
pub fn validate_request(
    url: &str,
    custom_alias: Option<&str>,
) -> Result<ValidatedRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let url = match check_url(url) {
        Ok(url) => Some(url),
        Err(message) => {
            errors.add(FIELD_URL, message);
            None
        }
    };

    let alias = custom_alias.filter(|alias| !alias.is_empty());
    if let Some(message) = alias.and_then(check_custom_alias) {
        errors.add(FIELD_CUSTOM_ALIAS, message);
    }

    match url {
        Some(url) if errors.is_empty() => Ok(ValidatedRequest {
            url,
            custom_alias: alias.map(ShortCode::new_unchecked),
        }),
        _ => Err(errors),
    }
}

fn check_url(url: &str) -> Result<String, String> {
    if url.is_empty() {
        return Err(format!("{FIELD_URL} is required"));
    }

    let invalid = || format!("{FIELD_URL} must be a valid URL");

    // The parser drops these silently, so the raw input would differ from
    // what was validated.
    if url.chars().any(char::is_control) || url.trim() != url {
        return Err(invalid());
    }

    let parsed = url::Url::parse(url).map_err(|_| invalid())?;
    let http = matches!(parsed.scheme(), "http" | "https");
    if !http || !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid());
    }

    if url.bytes().all(|b| b.is_ascii_graphic()) {
        Ok(url.to_string())
    } else {
        Ok(parsed.into())
    }
}

fn check_custom_alias(alias: &str) -> Option<String> {
    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(format!(
            "{FIELD_CUSTOM_ALIAS} must contain only alphanumeric characters"
        ));
    }
    if alias.len() < MIN_LENGTH {
        return Some(format!(
            "{FIELD_CUSTOM_ALIAS} must be at least {MIN_LENGTH} characters long"
        ));
    }
    if alias.len() > MAX_LENGTH {
        return Some(format!(
            "{FIELD_CUSTOM_ALIAS} must be at most {MAX_LENGTH} characters long"
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_url_without_alias() {
        let request = validate_request("https://example.com", None).unwrap();
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.custom_alias, None);

        let request = validate_request("http://example.com/a?b=c", Some("")).unwrap();
        assert_eq!(request.url, "http://example.com/a?b=c");
        assert_eq!(request.custom_alias, None);
    }

    #[test]
    fn returns_alias_with_case_preserved() {
        let code = validate_request("https://example.com", Some("MyAlias9"))
            .unwrap()
            .custom_alias
            .unwrap();
        assert_eq!(code.as_str(), "MyAlias9");
    }

    #[test]
    fn url_is_required() {
        let errors = validate_request("", None).unwrap_err();
        assert_eq!(errors.get(FIELD_URL), Some("url is required"));
    }

    #[test]
    fn rejects_malformed_or_non_http_urls() {
        for url in ["not-a-url", "ftp://example.com", "mailto:me@example.com", "https://"] {
            let errors = validate_request(url, None).unwrap_err();
            assert_eq!(
                errors.get(FIELD_URL),
                Some("url must be a valid URL"),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_control_characters_and_surrounding_whitespace() {
        for url in [
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            "https://exa\rmple.com",
            " https://example.com",
            "https://example.com ",
            "https://example.com/\u{7f}",
        ] {
            let errors = validate_request(url, Some("nl123")).unwrap_err();
            assert_eq!(
                errors.get(FIELD_URL),
                Some("url must be a valid URL"),
                "{url:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_ascii_url_is_stored_percent_encoded() {
        let request = validate_request("https://example.com/caf\u{e9}", None).unwrap();
        assert_eq!(request.url, "https://example.com/caf%C3%A9");

        let request = validate_request("https://b\u{fc}cher.example/", None).unwrap();
        assert_eq!(request.url, "https://xn--bcher-kva.example/");
        assert!(request.url.bytes().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn custom_alias_length_bounds() {
        let errors = validate_request("https://example.com", Some("ab")).unwrap_err();
        assert_eq!(
            errors.get(FIELD_CUSTOM_ALIAS),
            Some("customAlias must be at least 3 characters long")
        );

        let long = "a".repeat(MAX_LENGTH + 1);
        let errors = validate_request("https://example.com", Some(&long)).unwrap_err();
        assert_eq!(
            errors.get(FIELD_CUSTOM_ALIAS),
            Some("customAlias must be at most 20 characters long")
        );

        let longest = "a".repeat(MAX_LENGTH);
        assert!(validate_request("https://example.com", Some(&longest)).is_ok());
    }

    #[test]
    fn custom_alias_must_be_alphanumeric() {
        let errors = validate_request("https://example.com", Some("my-alias")).unwrap_err();
        assert_eq!(
            errors.get(FIELD_CUSTOM_ALIAS),
            Some("customAlias must contain only alphanumeric characters")
        );
    }

    #[test]
    fn collects_every_failing_field() {
        let errors = validate_request("", Some("x")).unwrap_err();
        assert_eq!(errors.iter().count(), 2);
        assert_eq!(
            errors.to_string(),
            "customAlias: customAlias must be at least 3 characters long; url: url is required"
        );
    }
}
