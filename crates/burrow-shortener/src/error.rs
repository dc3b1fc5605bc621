use crate::validation::ValidationErrors;
use burrow_core::{CoreError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Errors surfaced by [`ShortenerService`](crate::ShortenerService).
///
/// Cache failures never appear here: the service logs and absorbs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("short code already exists: {0}")]
    AlreadyExists(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

impl From<ValidationErrors> for ShortenerError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) | CoreError::InvalidInput(message) => {
                Self::InvalidInput(message)
            }
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::AlreadyExists(code) => Self::AlreadyExists(code),
            StorageError::NotFound(code) => Self::NotFound(code),
            StorageError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::RepositoryUnavailable(other.to_string()),
        }
    }
}
