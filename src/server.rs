//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::clock::SystemClock;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geo::{GeoLookup, IpApiGeoLookup, NullGeoLookup};
use crate::infrastructure::persistence::{
    PgClickRepository, PgShortUrlRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::{AppSettings, AppState, Repositories};
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// How long queued clicks may take to flush after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - IP geolocation provider
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache = connect_cache(&config).await;
    let geo = build_geo_lookup(&config);
    tracing::info!(provider = geo.name(), "Geolocation provider selected");

    let pool = Arc::new(pool);
    let repos = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        short_urls: Arc::new(PgShortUrlRepository::new(pool.clone())),
        clicks: Arc::new(PgClickRepository::new(pool.clone())),
    };

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repos.clicks.clone(),
        geo,
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(
        repos,
        cache,
        Arc::new(SystemClock),
        Arc::new(RandomCodeGenerator),
        AppSettings::from(&config),
        click_tx,
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every click sender with it) is dropped at this point,
    // so the worker drains the queue and exits.
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Click worker drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Click worker panicked"),
        Err(_) => tracing::warn!("Click worker did not drain in time, pending clicks lost"),
    }

    pool.close().await;
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Connects to Redis when configured. Failure degrades to [`NullCache`]:
/// redirects keep working, the shorten quota is not enforced.
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!(ttl_seconds = config.cache_ttl_seconds, "Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Redis, using NullCache");
            Arc::new(NullCache::new())
        }
    }
}

fn build_geo_lookup(config: &Config) -> Arc<dyn GeoLookup> {
    if !config.geo_enabled {
        return Arc::new(NullGeoLookup);
    }

    match IpApiGeoLookup::new(
        &config.geo_api_url,
        Duration::from_millis(config.geo_timeout_ms),
    ) {
        Ok(geo) => Arc::new(geo),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build geolocation client, disabling lookups");
            Arc::new(NullGeoLookup)
        }
    }
}

/// Completes on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
