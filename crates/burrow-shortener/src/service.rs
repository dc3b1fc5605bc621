use crate::config::ShortenerConfig;
use crate::error::{Result, ShortenerError};
use crate::model::{CacheHealth, CreateUrlRequest, HealthReport, UrlResponse};
use crate::validation::validate_request;
use burrow_core::{ReadRepository, Repository, ShortCode, StorageError, UrlCache, UrlRecord};
use burrow_generator::Generator;
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, trace, warn};

/// Allocates, resolves and counts short URLs.
///
/// The repository is the source of truth. The cache is read-through on
/// lookups and written after every successful create or increment; any
/// cache failure is logged and ignored. Each backend call runs under
/// [`ShortenerConfig::operation_timeout`], and an expired deadline drops
/// the in-flight call.
///
/// Backends are held by value. Pass `Arc`-wrapped backends to get a cheaply
/// cloneable service.
pub struct ShortenerService<R, C, G> {
    repository: R,
    cache: C,
    generator: Arc<G>,
    config: Arc<ShortenerConfig>,
}

impl<R: Clone, C: Clone, G> Clone for ShortenerService<R, C, G> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            cache: self.cache.clone(),
            generator: Arc::clone(&self.generator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R: Repository, C: UrlCache, G: Generator> ShortenerService<R, C, G> {
    pub fn new(repository: R, cache: C, generator: G, config: ShortenerConfig) -> Self {
        Self {
            repository,
            cache,
            generator: Arc::new(generator),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    /// Creates a short URL, using the custom alias when one is supplied and
    /// a generated code otherwise.
    ///
    /// Generated codes that collide are replaced with fresh ones up to
    /// `max_generation_attempts` times. A colliding custom alias fails
    /// straight away with [`ShortenerError::AlreadyExists`].
    pub async fn create_short_url(&self, request: &CreateUrlRequest) -> Result<UrlResponse> {
        let validated = validate_request(&request.url, request.custom_alias.as_deref())?;

        let created = match validated.custom_alias {
            Some(code) => self.allocate(code, &validated.url).await?,
            None => self.allocate_generated(&validated.url).await?,
        };

        self.cache_put(&created).await;
        info!(
            code = %created.short_code,
            url = %created.original_url,
            "Created short URL"
        );
        Ok(UrlResponse::from_record(&created, &self.config.base_url))
    }

    /// Resolves a short code, consulting the cache before the repository.
    pub async fn get_url(&self, code: &str) -> Result<UrlRecord> {
        let code = parse_code(code)?;

        if let Some(record) = self.cache_get(&code).await {
            debug!(code = %code, "Cache hit");
            return Ok(record);
        }

        trace!(code = %code, "Cache miss, reading repository");
        let record = self
            .with_deadline("find_by_short_code", self.repository.find_by_short_code(&code))
            .await?;
        self.cache_put(&record).await;
        Ok(record)
    }

    /// Atomically bumps the click counter and refreshes the cached record.
    pub async fn increment_clicks(&self, code: &str) -> Result<UrlRecord> {
        let code = parse_code(code)?;

        let updated = self
            .with_deadline("increment_clicks", self.repository.increment_clicks(&code))
            .await?;
        self.cache_put(&updated).await;
        Ok(updated)
    }

    /// Resolves `code` and counts the visit.
    ///
    /// A failed increment does not fail the redirect: the resolved record is
    /// returned with its previous click count.
    pub async fn redirect(&self, code: &str) -> Result<UrlRecord> {
        let record = self.get_url(code).await?;

        match self.increment_clicks(code).await {
            Ok(updated) => {
                info!(
                    code,
                    url = %updated.original_url,
                    clicks = updated.clicks,
                    "Redirecting"
                );
                Ok(updated)
            }
            Err(e) => {
                warn!(code, error = %e, "Failed to increment clicks");
                info!(
                    code,
                    url = %record.original_url,
                    clicks = record.clicks,
                    "Redirecting"
                );
                Ok(record)
            }
        }
    }

    /// Readiness probe. Fails only when the repository is unreachable; an
    /// unhealthy cache is reported as degraded.
    pub async fn health(&self) -> Result<HealthReport> {
        self.with_deadline("health_check", self.repository.health_check())
            .await?;

        let cache = match timeout(self.config.operation_timeout, self.cache.ping()).await {
            Ok(Ok(())) => CacheHealth::Up,
            Ok(Err(e)) => {
                warn!(error = %e, "Cache ping failed");
                CacheHealth::Degraded
            }
            Err(_) => {
                warn!("Cache ping exceeded its deadline");
                CacheHealth::Degraded
            }
        };

        Ok(HealthReport { cache })
    }

    /// Releases the repository. Safe to call more than once.
    pub async fn close(&self) -> Result<()> {
        self.with_deadline("close", self.repository.close()).await
    }

    async fn allocate_generated(&self, url: &str) -> Result<UrlRecord> {
        let max_attempts = self.config.max_generation_attempts.max(1);
        let mut attempt = 1;

        loop {
            let code: ShortCode = self.generator.generate().into();
            match self.allocate(code, url).await {
                Err(ShortenerError::AlreadyExists(code)) if attempt < max_attempts => {
                    warn!(code = %code, attempt, "Generated short code collided, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn allocate(&self, code: ShortCode, url: &str) -> Result<UrlRecord> {
        // Fast path only; the atomic insert below is what settles races.
        if self
            .with_deadline("exists", self.repository.exists(&code))
            .await?
        {
            debug!(code = %code, "Short code already taken");
            return Err(ShortenerError::AlreadyExists(code.to_string()));
        }

        let record = UrlRecord::new(code, url)?;
        self.with_deadline("create", self.repository.create(record))
            .await
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, StorageError>>,
    ) -> Result<T> {
        match timeout(self.config.operation_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if e.is_unavailable() {
                    error!(operation, error = %e, "Repository call failed");
                }
                Err(e.into())
            }
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.config.operation_timeout.as_millis() as u64,
                    "Repository call exceeded its deadline"
                );
                Err(ShortenerError::RepositoryUnavailable(format!(
                    "{operation} timed out after {:?}",
                    self.config.operation_timeout
                )))
            }
        }
    }

    async fn cache_get(&self, code: &ShortCode) -> Option<UrlRecord> {
        match timeout(self.config.operation_timeout, self.cache.get_url(code)).await {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                warn!(code = %code, error = %e, "Cache error during get");
                None
            }
            Err(_) => {
                warn!(code = %code, "Cache get exceeded its deadline");
                None
            }
        }
    }

    async fn cache_put(&self, record: &UrlRecord) {
        let write = self.cache.set_url(record, self.config.cache_ttl);
        match timeout(self.config.operation_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(code = %record.short_code, error = %e, "Failed to cache URL");
            }
            Err(_) => {
                warn!(code = %record.short_code, "Cache write exceeded its deadline");
            }
        }
    }
}

/// A string that is not a well-formed code cannot name a stored record.
fn parse_code(code: &str) -> Result<ShortCode> {
    ShortCode::new(code).map_err(|_| ShortenerError::NotFound(code.to_string()))
}
