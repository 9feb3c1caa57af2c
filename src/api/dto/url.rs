//! DTOs for URL shortening and management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{ShortUrl, ShortUrlWithClicks};

/// Request body for `POST /url/shorten`.
///
/// `customCode` may be omitted, `null` or `""`; all three mean "generate one".
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    #[serde(default)]
    pub custom_code: Option<String>,
}

/// A short URL as returned by the URL endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    /// Builds the response for a URL with a known click count.
    pub fn new(url: ShortUrl, clicks: i64, short_url: String) -> Self {
        Self {
            id: url.id,
            original_url: url.original_url,
            short_url,
            short_code: url.short_code,
            clicks,
            created_at: url.created_at,
        }
    }

    pub fn from_with_clicks(item: ShortUrlWithClicks, short_url: String) -> Self {
        Self::new(item.url, item.clicks, short_url)
    }
}
