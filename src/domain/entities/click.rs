//! Click entity representing a single redirect visit.

use chrono::{DateTime, Utc};

/// A recorded visit to a short code's redirect endpoint.
///
/// Click rows form an append-only audit trail: they are never updated, and
/// only disappear together with their owning short URL.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub short_url_id: i64,
    pub click_time: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub location: Option<String>,
}

/// Input data for recording a click.
///
/// `click_time` is stamped by the redirect handler, not by the database, so
/// that queued events keep the time of the visit.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub short_url_id: i64,
    pub click_time: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub location: Option<String>,
}
