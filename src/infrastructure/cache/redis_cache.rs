//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const LINK_PREFIX: &str = "link:";

/// `MULTI; INCR key; EXPIRE key window NX; EXEC`.
///
/// `NX` only sets a TTL on a key that has none, so the window starts at the
/// first increment and a lost EXPIRE is repaired by the next call.
fn counter_pipeline(key: &str, window_seconds: u64) -> redis::Pipeline {
    let window = i64::try_from(window_seconds).unwrap_or(i64::MAX);

    let mut pipe = redis::pipe();
    pipe.atomic()
        .incr(key, 1u64)
        .cmd("EXPIRE")
        .arg(key)
        .arg(window)
        .arg("NX")
        .ignore();
    pipe
}

/// Redis cache for redirect lookups and quota counters.
///
/// Uses `ConnectionManager` for automatic reconnection. All operations are
/// fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies to [`CacheService::set_link`] calls with
    /// `ttl_seconds = None` (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut probe = manager.clone();
        probe
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn link_key(short_code: &str) -> String {
        format!("{LINK_PREFIX}{short_code}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<CachedLink>> {
        let key = Self::link_key(short_code);
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CachedLink>(&raw) {
                Ok(link) => {
                    debug!(short_code, "Cache HIT");
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!(short_code, error = %e, "Discarding undecodable cache entry");
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(short_code, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(short_code, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = Self::link_key(short_code);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(e.to_string()))?;
        let mut conn = self.conn.clone();

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            warn!(short_code, error = %e, "Redis SET failed");
        } else {
            debug!(short_code, ttl, "Cache SET");
        }
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = Self::link_key(short_code);
        let mut conn = self.conn.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) if deleted > 0 => debug!(short_code, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(short_code, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn incr_with_expiry(&self, key: &str, window_seconds: u64) -> CacheResult<Option<u64>> {
        let mut conn = self.conn.clone();

        match counter_pipeline(key, window_seconds)
            .query_async::<(u64,)>(&mut conn)
            .await
        {
            Ok((count,)) => Ok(Some(count)),
            Err(e) => {
                warn!(key, error = %e, "Redis counter update failed, counter untracked");
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
