//! Per-user daily shorten quota.

use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

const QUOTA_WINDOW_SECONDS: u64 = 24 * 60 * 60;

/// Counts shorten requests per username in the cache store.
///
/// The counter is created with a one-day expiry on first use. When the cache
/// backend does not track counters (no Redis, or a Redis error) the request
/// is allowed. A limit of `0` disables the quota.
pub struct QuotaService {
    cache: Arc<dyn CacheService>,
    daily_limit: u64,
}

impl QuotaService {
    pub fn new(cache: Arc<dyn CacheService>, daily_limit: u64) -> Self {
        Self { cache, daily_limit }
    }

    fn key(username: &str) -> String {
        format!("rate:{username}")
    }

    /// Records one shorten request for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TooManyRequests`] once the daily limit is exceeded.
    pub async fn consume(&self, username: &str) -> Result<(), AppError> {
        if self.daily_limit == 0 {
            return Ok(());
        }

        let count = match self
            .cache
            .incr_with_expiry(&Self::key(username), QUOTA_WINDOW_SECONDS)
            .await
        {
            Ok(Some(count)) => count,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(username, error = %e, "Quota check skipped");
                return Ok(());
            }
        };

        if count > self.daily_limit {
            return Err(AppError::too_many_requests(
                "Daily shorten limit reached",
                json!({ "limit": self.daily_limit }),
            ));
        }

        Ok(())
    }
}
