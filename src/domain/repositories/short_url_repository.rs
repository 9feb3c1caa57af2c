//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlWithClicks};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Creates a new short URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a short URL by its code (exact, case-sensitive match).
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError>;

    /// Checks whether a code is already taken.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists a user's short URLs with click totals, newest first.
    async fn list_by_user_with_clicks(
        &self,
        user_id: i64,
    ) -> Result<Vec<ShortUrlWithClicks>, AppError>;

    /// Deletes a short URL and its click history.
    ///
    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Total number of short URLs.
    async fn count(&self) -> Result<i64, AppError>;
}
