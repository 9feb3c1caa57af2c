//! Repository trait for click tracking.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for recording clicks and reading their aggregates.
///
/// Clicks are append-only; there is no update operation. Aggregation happens
/// in storage so analytics never loads a URL's full click history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors, including a missing
    /// parent short URL.
    async fn insert(&self, new_click: NewClick) -> Result<Click, AppError>;

    async fn count_by_short_url(&self, short_url_id: i64) -> Result<i64, AppError>;

    /// Click counts per UTC calendar day, ascending by day.
    async fn daily_counts(&self, short_url_id: i64) -> Result<Vec<(NaiveDate, i64)>, AppError>;

    /// Click counts per recorded location, most frequent first, ties by name.
    /// Clicks without a location are left out.
    async fn location_counts(&self, short_url_id: i64) -> Result<Vec<(String, i64)>, AppError>;

    /// The `limit` most recent clicks, newest first.
    async fn recent(&self, short_url_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;

    /// Total number of recorded clicks.
    async fn count(&self) -> Result<i64, AppError>;
}
