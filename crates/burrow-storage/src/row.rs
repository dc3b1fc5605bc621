//! Row mapping and error classification shared by the SQL backends.

use burrow_core::{ShortCode, StorageError, UrlRecord};
use jiff::Timestamp;

/// Columns selected by every SQL query returning a record.
pub(crate) const RECORD_COLUMNS: &str =
    "id, short_code, original_url, clicks, created_at, updated_at";

/// A `urls` row as stored: timestamps in unix milliseconds.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UrlRow {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<UrlRow> for UrlRecord {
    type Error = StorageError;

    fn try_from(row: UrlRow) -> Result<Self, Self::Error> {
        let short_code = ShortCode::new(row.short_code).map_err(|e| {
            StorageError::InvalidData(format!("row {} has an invalid short code: {e}", row.id))
        })?;
        let clicks = u64::try_from(row.clicks).map_err(|_| {
            StorageError::InvalidData(format!(
                "row {} has a negative click count: {}",
                row.id, row.clicks
            ))
        })?;

        Ok(UrlRecord {
            id: row.id,
            short_code,
            original_url: row.original_url,
            clicks,
            created_at: parse_millis(row.created_at)?,
            updated_at: parse_millis(row.updated_at)?,
        })
    }
}

pub(crate) fn now_millis() -> i64 {
    Timestamp::now().as_millisecond()
}

fn parse_millis(value: i64) -> Result<Timestamp, StorageError> {
    Timestamp::from_millisecond(value)
        .map_err(|e| StorageError::InvalidData(format!("invalid timestamp '{value}': {e}")))
}

pub(crate) fn clicks_to_sql(clicks: u64) -> Result<i64, StorageError> {
    i64::try_from(clicks)
        .map_err(|_| StorageError::InvalidInput(format!("click count {clicks} is out of range")))
}

/// Maps driver-level failures that look the same on every SQL backend.
///
/// Database errors are classified by the backend itself before falling
/// back here.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::RowNotFound => StorageError::NotFound(message),
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed => StorageError::Closed,
        sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

pub(crate) fn map_migrate_error(err: sqlx::migrate::MigrateError) -> StorageError {
    StorageError::Unavailable(format!("failed to run migrations: {err}"))
}
