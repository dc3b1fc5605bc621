use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`].
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    ///
    /// Returns [`StorageError::NotFound`] if the code does not exist.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<UrlRecord>;

    /// Checks whether a short code already exists in the repository.
    ///
    /// This is a fast path only; it races with concurrent inserts and
    /// [`Repository::create`] remains the authority on uniqueness.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Liveness probe for the backend connection.
    async fn health_check(&self) -> Result<()>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record and returns it with the backend-assigned id.
    ///
    /// Returns [`StorageError::AlreadyExists`] if the code is taken. Of N
    /// concurrent calls for one code exactly one succeeds.
    async fn create(&self, record: UrlRecord) -> Result<UrlRecord>;

    /// Atomically adds one click and returns the updated record.
    ///
    /// Returns [`StorageError::NotFound`] if the code does not exist.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<UrlRecord>;

    /// Releases backend resources. Calling it more than once is a no-op.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for Arc<T> {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<UrlRecord> {
        (**self).find_by_short_code(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn health_check(&self) -> Result<()> {
        (**self).health_check().await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for Arc<T> {
    async fn create(&self, record: UrlRecord) -> Result<UrlRecord> {
        (**self).create(record).await
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<UrlRecord> {
        (**self).increment_clicks(code).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
