//! Short URL entity mapping a short code to its target.

use chrono::{DateTime, Utc};

/// A short code owned by a user, resolving to an original URL.
#[derive(Debug, Clone)]
pub struct ShortUrl {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortUrl {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for creating a short URL.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub original_url: String,
    pub short_code: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A short URL together with its total click count.
#[derive(Debug, Clone)]
pub struct ShortUrlWithClicks {
    pub url: ShortUrl,
    pub clicks: i64,
}
