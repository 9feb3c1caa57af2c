//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Redirect target cached per short code.
///
/// Carries the row id so that a cache hit can still enqueue a click event
/// without touching the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub id: i64,
    pub original_url: String,
}

/// Key-value cache used for redirect lookups and shorten quotas.
///
/// Implementations are fail-open: backend errors are logged and reported as
/// a miss (or an untracked counter) instead of failing the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached redirect target for a short code.
    ///
    /// `Ok(None)` on a miss or a backend error.
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores a redirect target with an optional TTL (implementation default when `None`).
    async fn set_link(
        &self,
        short_code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached redirect target. Used when a short URL is deleted.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Increments a counter, setting `window_seconds` expiry when it is created.
    ///
    /// Returns the new value, or `None` when the backend does not track counters.
    async fn incr_with_expiry(&self, key: &str, window_seconds: u64) -> CacheResult<Option<u64>>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}
