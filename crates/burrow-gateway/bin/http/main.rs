mod cli;
mod telemetry;

use crate::cli::{CacheBackendArg, StorageBackendArg, CLI};
use anyhow::Context;
use burrow_cache::{MokaUrlCache, NoopCache, RedisUrlCache};
use burrow_core::{Repository, UrlCache};
use burrow_gateway::{App, AppState};
use burrow_generator::RandomGenerator;
use burrow_shortener::{ShortenerConfig, ShortenerService};
use burrow_storage::{InMemoryRepository, PostgresRepository, SqliteRepository};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting burrow"
    );

    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;
    let generator = RandomGenerator::new(config.code_length)?;

    let shortener = ShortenerService::new(
        repository,
        cache,
        generator,
        ShortenerConfig::builder()
            .base_url(config.base_url.clone())
            .cache_ttl(Duration::from_secs(config.cache_ttl_secs))
            .operation_timeout(Duration::from_millis(config.operation_timeout_ms))
            .build(),
    );

    let app = App::router(AppState::new(shortener.clone()));
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "serving HTTP");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shortener.close().await?;
    info!("repository closed, bye");
    Ok(())
}

async fn build_repository(config: &CLI) -> anyhow::Result<Arc<dyn Repository>> {
    let repository: Arc<dyn Repository> = match config.storage {
        StorageBackendArg::Memory => Arc::new(InMemoryRepository::new()),
        StorageBackendArg::Sqlite => Arc::new(
            SqliteRepository::connect(&config.sqlite_path)
                .await
                .context("failed to open SQLite repository")?,
        ),
        StorageBackendArg::Postgres => {
            let url = config
                .postgres_url
                .as_deref()
                .context("postgres url is required when storage backend is postgres")?;
            Arc::new(
                PostgresRepository::connect(url)
                    .await
                    .context("failed to connect PostgreSQL repository")?,
            )
        }
    };
    Ok(repository)
}

/// Redis being down at startup is not fatal: the service runs uncached.
async fn build_cache(config: &CLI) -> Arc<dyn UrlCache> {
    match config.cache {
        CacheBackendArg::None => Arc::new(NoopCache),
        CacheBackendArg::Memory => Arc::new(MokaUrlCache::new()),
        CacheBackendArg::Redis => match RedisUrlCache::connect(&config.redis_url).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, continuing without cache");
                Arc::new(NoopCache)
            }
        },
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
