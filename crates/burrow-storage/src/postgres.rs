use crate::row::{
    clicks_to_sql, map_migrate_error, map_sqlx_error, now_millis, UrlRow, RECORD_COLUMNS,
};
use async_trait::async_trait;
use burrow_core::repository::Result;
use burrow_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use sqlx::error::DatabaseError;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, error, trace};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";
const DEFAULT_POOL_SIZE: u32 = 20;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL implementation of the repository contract.
///
/// SQLSTATE codes are classified into [`StorageError`] at this boundary,
/// so callers see the same taxonomy as with the embedded backends.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing connection pool. Migrations
    /// are not run.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a new connection pool and runs the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_pool_size(database_url, DEFAULT_POOL_SIZE).await
    }

    pub async fn connect_with_pool_size(database_url: &str, pool_size: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;

        Self::migrate(&pool).await?;
        debug!(pool_size, "Connected PostgreSQL repository");
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(pool: &PgPool) -> Result<()> {
        MIGRATOR.run(pool).await.map_err(map_migrate_error)
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Classifies a PostgreSQL error by SQLSTATE.
fn classify_database_error(
    db_err: &dyn DatabaseError,
    code: &ShortCode,
    operation: &str,
) -> StorageError {
    let sqlstate = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
    error!(
        operation,
        code = %code,
        sqlstate = %sqlstate,
        constraint = db_err.constraint().unwrap_or_default(),
        message = db_err.message(),
        "PostgreSQL error"
    );

    match sqlstate.as_str() {
        // unique_violation
        "23505" if db_err.constraint() == Some(SHORT_CODE_CONSTRAINT) => {
            StorageError::AlreadyExists(code.to_string())
        }
        "23505" => StorageError::InvalidInput(format!(
            "unique constraint violation: {}",
            db_err.message()
        )),
        // not_null_violation
        "23502" => StorageError::InvalidInput(format!(
            "required field missing: {}",
            db_err.message()
        )),
        // check_violation
        "23514" => StorageError::InvalidInput(format!(
            "check constraint violation: {}",
            db_err.message()
        )),
        // connection_exception, connection_does_not_exist, connection_failure
        "08000" | "08003" | "08006" => StorageError::Unavailable(format!(
            "database connection error: {}",
            db_err.message()
        )),
        _ => StorageError::Query(format!("database error [{sqlstate}]: {}", db_err.message())),
    }
}

fn map_postgres_error(err: sqlx::Error, code: &ShortCode, operation: &str) -> StorageError {
    match err.as_database_error() {
        Some(db_err) => classify_database_error(db_err, code, operation),
        None => map_sqlx_error(err),
    }
}

#[async_trait]
impl ReadRepository for PostgresRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<UrlRecord> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM urls WHERE short_code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_postgres_error(e, code, "find url by short code"))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StorageError::NotFound(code.to_string())),
        }
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM urls WHERE short_code = $1 LIMIT 1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_postgres_error(e, code, "check url existence"))?
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
impl Repository for PostgresRepository {
    async fn create(&self, record: UrlRecord) -> Result<UrlRecord> {
        let code = record.short_code.clone();

        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            INSERT INTO urls (short_code, original_url, clicks, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
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
        .map_err(|e| map_postgres_error(e, &code, "create url"))?;

        let created = UrlRecord::try_from(row)?;
        debug!(code = %created.short_code, id = created.id, "Stored record in PostgreSQL");
        Ok(created)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<UrlRecord> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            UPDATE urls
            SET clicks = clicks + 1, updated_at = $1
            WHERE short_code = $2
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(now_millis())
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_postgres_error(e, code, "increment clicks"))?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(code.to_string()));
        };
        let updated = UrlRecord::try_from(row)?;
        trace!(code = %code, clicks = updated.clicks, "Incremented clicks in PostgreSQL");
        Ok(updated)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
