use crate::row::{
    clicks_to_sql, map_migrate_error, map_sqlx_error, now_millis, UrlRow, RECORD_COLUMNS,
};
use async_trait::async_trait;
use burrow_core::repository::Result;
use burrow_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

const DEFAULT_POOL_SIZE: u32 = 5;

/// Embedded, file-backed SQLite implementation of the repository contract.
///
/// Uniqueness is enforced by the `UNIQUE` constraint on `short_code`, ids
/// come from `AUTOINCREMENT`, and click increments are a single
/// `UPDATE ... RETURNING` statement.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool. Migrations are not run.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file at `path` and runs
    /// the embedded migrations.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with_pool_size(path, DEFAULT_POOL_SIZE).await
    }

    pub async fn connect_with_pool_size(path: impl AsRef<Path>, pool_size: u32) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Unavailable(format!(
                    "failed to create data directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        MIGRATOR.run(&pool).await.map_err(map_migrate_error)?;
        debug!(path = %path.display(), "Opened SQLite repository");

        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_sqlite_error(err: sqlx::Error, code: &ShortCode) -> StorageError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.kind() {
            ErrorKind::UniqueViolation => return StorageError::AlreadyExists(code.to_string()),
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                warn!(code = %code, error = %db_err, "SQLite constraint violation");
                return StorageError::InvalidInput(db_err.message().to_string());
            }
            _ => {}
        }
    }
    map_sqlx_error(err)
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<UrlRecord> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM urls WHERE short_code = ? LIMIT 1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StorageError::NotFound(code.to_string())),
        }
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM urls WHERE short_code = ? LIMIT 1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn create(&self, record: UrlRecord) -> Result<UrlRecord> {
        let code = record.short_code.clone();

        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            INSERT INTO urls (short_code, original_url, clicks, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.short_code.as_str())
        .bind(&record.original_url)
        .bind(clicks_to_sql(record.clicks)?)
        .bind(record.created_at.as_millisecond())
        .bind(record.updated_at.as_millisecond())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlite_error(e, &code))?;

        let created = UrlRecord::try_from(row)?;
        debug!(code = %created.short_code, id = created.id, "Stored record in SQLite");
        Ok(created)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<UrlRecord> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            UPDATE urls
            SET clicks = clicks + 1, updated_at = ?
            WHERE short_code = ?
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(now_millis())
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlite_error(e, code))?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(code.to_string()));
        };
        let updated = UrlRecord::try_from(row)?;
        trace!(code = %code, clicks = updated.clicks, "Incremented clicks in SQLite");
        Ok(updated)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
