//! DTOs for per-URL analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::application::services::UrlAnalytics;
use crate::domain::entities::Click;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub url_data: UrlData,
    /// Click counts per UTC day, ascending.
    pub clicks_data: BTreeMap<String, i64>,
    pub recent_activity: Vec<ActivityItem>,
    pub avg_daily_clicks: i64,
    pub location_data: Vec<LocationCount>,
    pub top_location: Option<String>,
    pub device_data: NotMeasured,
    pub growth_rate: NotMeasured,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlData {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityItem {
    pub time: DateTime<Utc>,
    pub ip: Option<String>,
    pub device: String,
    pub referrer: Option<String>,
    pub location: String,
}

impl From<Click> for ActivityItem {
    fn from(click: Click) -> Self {
        Self {
            time: click.click_time,
            ip: click.ip,
            device: click.user_agent.unwrap_or_else(|| UNKNOWN.to_string()),
            referrer: click.referrer,
            location: click.location.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationCount {
    pub location: String,
    pub clicks: i64,
}

/// Marker for metrics the service does not collect.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotMeasured {
    pub status: String,
}

impl Default for NotMeasured {
    fn default() -> Self {
        Self {
            status: "not_measured".to_string(),
        }
    }
}

impl AnalyticsResponse {
    pub fn new(analytics: UrlAnalytics, short_url: String) -> Self {
        let top_location = analytics.top_location().map(str::to_string);

        Self {
            url_data: UrlData {
                original_url: analytics.url.original_url,
                short_code: analytics.url.short_code,
                short_url,
                total_clicks: analytics.total_clicks,
                created_at: analytics.url.created_at,
            },
            clicks_data: analytics.clicks_by_day,
            recent_activity: analytics.recent.into_iter().map(ActivityItem::from).collect(),
            avg_daily_clicks: analytics.avg_daily_clicks,
            location_data: analytics
                .locations
                .into_iter()
                .map(|(location, clicks)| LocationCount { location, clicks })
                .collect(),
            top_location,
            device_data: NotMeasured::default(),
            growth_rate: NotMeasured::default(),
        }
    }
}
