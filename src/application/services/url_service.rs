//! Short URL creation, resolution and management.

use serde_json::json;
use std::sync::Arc;

use super::auth_service::AuthUser;
use super::quota_service::QuotaService;
use crate::domain::clock::Clock;
use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlWithClicks};
use crate::domain::repositories::{ClickRepository, ShortUrlRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink};
use crate::utils::code_generator::{CodeGenerator, is_reserved, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;

/// Upper bound on generated-code attempts before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for creating and managing short URLs.
///
/// Owns the code uniqueness rules: a custom code never overwrites an existing
/// mapping, and generated codes are retried on collision, including
/// collisions detected by the store's unique index at insert time.
pub struct UrlService {
    short_urls: Arc<dyn ShortUrlRepository>,
    clicks: Arc<dyn ClickRepository>,
    cache: Arc<dyn CacheService>,
    quota: Arc<QuotaService>,
    codes: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl UrlService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        short_urls: Arc<dyn ShortUrlRepository>,
        clicks: Arc<dyn ClickRepository>,
        cache: Arc<dyn CacheService>,
        quota: Arc<QuotaService>,
        codes: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            short_urls,
            clicks,
            cache,
            quota,
            codes,
            clock,
            base_url: base_url.into(),
        }
    }

    /// Public URL for a short code.
    pub fn short_url_for(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Creates a short URL owned by `owner`.
    ///
    /// An empty or whitespace-only `custom_code` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid,
    /// [`AppError::Conflict`] if the custom code is taken, and
    /// [`AppError::TooManyRequests`] when the owner's daily quota is exhausted.
    pub async fn shorten(
        &self,
        owner: &AuthUser,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<ShortUrl, AppError> {
        let original_url = normalize_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let custom_code = custom_code.map(str::trim).filter(|c| !c.is_empty());
        if let Some(code) = custom_code {
            validate_custom_code(code)?;
        }

        self.quota.consume(&owner.username).await?;

        let url = match custom_code {
            Some(code) => self.create_with_custom_code(owner, original_url, code).await?,
            None => self.create_with_generated_code(owner, original_url).await?,
        };

        tracing::info!(
            user_id = owner.id,
            short_code = %url.short_code,
            "Short URL created"
        );
        Ok(url)
    }

    async fn create_with_custom_code(
        &self,
        owner: &AuthUser,
        original_url: String,
        code: &str,
    ) -> Result<ShortUrl, AppError> {
        if self.short_urls.code_exists(code).await? {
            return Err(custom_code_taken(code));
        }

        self.short_urls
            .create(self.new_short_url(owner, original_url, code.to_string()))
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => custom_code_taken(code),
                other => other,
            })
    }

    async fn create_with_generated_code(
        &self,
        owner: &AuthUser,
        original_url: String,
    ) -> Result<ShortUrl, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.generate();

            if is_reserved(&code) {
                tracing::debug!(attempt, "Generated code is a reserved route name");
                continue;
            }

            if self.short_urls.code_exists(&code).await? {
                tracing::debug!(attempt, "Generated code already in use");
                continue;
            }

            match self
                .short_urls
                .create(self.new_short_url(owner, original_url.clone(), code))
                .await
            {
                Ok(url) => return Ok(url),
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, "Generated code collided at insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    fn new_short_url(&self, owner: &AuthUser, original_url: String, code: String) -> NewShortUrl {
        NewShortUrl {
            original_url,
            short_code: code,
            user_id: owner.id,
            created_at: self.clock.now(),
        }
    }

    /// Resolves a short code to its redirect target, cache first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn resolve(&self, code: &str) -> Result<CachedLink, AppError> {
        match self.cache.get_link(code).await {
            Ok(Some(link)) => return Ok(link),
            Ok(None) => {}
            Err(e) => tracing::warn!(short_code = code, error = %e, "Cache lookup failed"),
        }

        let url = self
            .short_urls
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))?;

        let link = CachedLink {
            id: url.id,
            original_url: url.original_url,
        };

        if let Err(e) = self.cache.set_link(code, &link, None).await {
            tracing::warn!(short_code = code, error = %e, "Cache store failed");
        }

        Ok(link)
    }

    /// Lists the owner's short URLs with click counts, newest first.
    pub async fn list_for_owner(&self, owner: &AuthUser) -> Result<Vec<ShortUrlWithClicks>, AppError> {
        self.short_urls.list_by_user_with_clicks(owner.id).await
    }

    /// Returns one of the owner's short URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the URL does not exist or belongs to
    /// someone else, so ids of other users' URLs are not disclosed.
    pub async fn get_for_owner(
        &self,
        owner: &AuthUser,
        id: i64,
    ) -> Result<ShortUrlWithClicks, AppError> {
        let url = self
            .short_urls
            .find_by_id(id)
            .await?
            .filter(|u| u.is_owned_by(owner.id))
            .ok_or_else(|| AppError::forbidden("Access denied", json!({ "id": id })))?;

        let clicks = self.clicks.count_by_short_url(url.id).await?;
        Ok(ShortUrlWithClicks { url, clicks })
    }

    /// Deletes one of the owner's short URLs together with its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id and
    /// [`AppError::Forbidden`] if the URL belongs to someone else.
    pub async fn delete_for_owner(&self, owner: &AuthUser, id: i64) -> Result<(), AppError> {
        let url = self
            .short_urls
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))?;

        if !url.is_owned_by(owner.id) {
            return Err(AppError::forbidden(
                "You can only delete your own URLs",
                json!({ "id": id }),
            ));
        }

        if !self.short_urls.delete(id).await? {
            return Err(AppError::not_found("Short URL not found", json!({ "id": id })));
        }

        if let Err(e) = self.cache.invalidate(&url.short_code).await {
            tracing::warn!(short_code = %url.short_code, error = %e, "Cache invalidation failed");
        }

        tracing::info!(user_id = owner.id, short_code = %url.short_code, "Short URL deleted");
        Ok(())
    }
}

fn custom_code_taken(code: &str) -> AppError {
    AppError::conflict("Custom code already in use", json!({ "code": code }))
}
