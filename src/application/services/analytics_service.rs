//! Per-URL click analytics.

use serde_json::json;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::auth_service::AuthUser;
use crate::domain::entities::{Click, ShortUrl};
use crate::domain::repositories::{ClickRepository, ShortUrlRepository};
use crate::error::AppError;

/// Maximum number of clicks in the recent activity list.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Aggregated click data for one short URL.
#[derive(Debug, Clone)]
pub struct UrlAnalytics {
    pub url: ShortUrl,
    pub total_clicks: i64,
    /// Clicks per UTC day, keyed `YYYY-MM-DD`, ascending.
    pub clicks_by_day: BTreeMap<String, i64>,
    /// Most recent clicks, newest first.
    pub recent: Vec<Click>,
    pub avg_daily_clicks: i64,
    /// Clicks per recorded location, most frequent first.
    pub locations: Vec<(String, i64)>,
}

impl UrlAnalytics {
    pub fn top_location(&self) -> Option<&str> {
        self.locations.first().map(|(name, _)| name.as_str())
    }
}

pub struct AnalyticsService {
    short_urls: Arc<dyn ShortUrlRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(short_urls: Arc<dyn ShortUrlRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { short_urls, clicks }
    }

    /// Builds analytics for a short code owned by `who`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Forbidden`] if the caller does not own it.
    pub async fn for_short_code(&self, who: &AuthUser, code: &str) -> Result<UrlAnalytics, AppError> {
        let url = self
            .short_urls
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))?;

        if !url.is_owned_by(who.id) {
            return Err(AppError::forbidden(
                "You can only view analytics for your own URLs",
                json!({ "code": code }),
            ));
        }

        let (total_clicks, daily, recent, locations) = tokio::try_join!(
            self.clicks.count_by_short_url(url.id),
            self.clicks.daily_counts(url.id),
            self.clicks.recent(url.id, RECENT_ACTIVITY_LIMIT),
            self.clicks.location_counts(url.id),
        )?;

        Ok(summarize(url, total_clicks, daily, recent, locations))
    }
}

/// Combines storage-side click aggregates into the analytics summary.
pub fn summarize(
    url: ShortUrl,
    total_clicks: i64,
    daily: Vec<(NaiveDate, i64)>,
    recent: Vec<Click>,
    locations: Vec<(String, i64)>,
) -> UrlAnalytics {
    let clicks_by_day: BTreeMap<String, i64> = daily
        .into_iter()
        .map(|(day, clicks)| (day.format("%Y-%m-%d").to_string(), clicks))
        .collect();
    let avg_daily_clicks = average_daily(total_clicks, clicks_by_day.len());

    UrlAnalytics {
        url,
        total_clicks,
        clicks_by_day,
        recent,
        avg_daily_clicks,
        locations,
    }
}

/// Integer average over days with at least one click. Zero without clicks.
pub fn average_daily(total: i64, distinct_days: usize) -> i64 {
    if distinct_days == 0 {
        0
    } else {
        total / distinct_days as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::repositories::{MockClickRepository, MockShortUrlRepository};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn click(id: i64, time: DateTime<Utc>, location: Option<&str>) -> Click {
        Click {
            id,
            short_url_id: 1,
            click_time: time,
            ip: Some("203.0.113.9".to_string()),
            user_agent: None,
            referrer: None,
            location: location.map(str::to_string),
        }
    }

    fn short_url(user_id: i64) -> ShortUrl {
        ShortUrl {
            id: 1,
            original_url: "https://example.com/".to_string(),
            short_code: "abc".to_string(),
            user_id,
            created_at: at(2024, 1, 1, 0),
        }
    }

    fn caller(id: i64) -> AuthUser {
        AuthUser {
            id,
            email: "x@example.com".to_string(),
            username: "x".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_summarize_daily_keys() {
        let summary = summarize(
            short_url(1),
            3,
            vec![(day(2024, 1, 1), 2), (day(2024, 1, 2), 1)],
            vec![],
            vec![],
        );

        assert_eq!(summary.total_clicks, 3);
        assert_eq!(summary.clicks_by_day["2024-01-01"], 2);
        assert_eq!(summary.clicks_by_day["2024-01-02"], 1);
        assert_eq!(
            summary.clicks_by_day.keys().cloned().collect::<Vec<_>>(),
            vec!["2024-01-01", "2024-01-02"]
        );
        assert_eq!(summary.avg_daily_clicks, 1);
    }

    #[test]
    fn test_average_daily() {
        assert_eq!(average_daily(0, 0), 0);
        assert_eq!(average_daily(3, 2), 1);
        assert_eq!(average_daily(10, 2), 5);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(short_url(1), 0, vec![], vec![], vec![]);

        assert_eq!(summary.total_clicks, 0);
        assert_eq!(summary.avg_daily_clicks, 0);
        assert!(summary.clicks_by_day.is_empty());
        assert!(summary.top_location().is_none());
    }

    #[tokio::test]
    async fn test_other_users_analytics_forbidden() {
        let mut urls = MockShortUrlRepository::new();
        urls.expect_find_by_code()
            .returning(|_| Ok(Some(short_url(1))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_by_short_url().times(0);
        clicks.expect_recent().times(0);

        let service = AnalyticsService::new(Arc::new(urls), Arc::new(clicks));
        assert!(matches!(
            service.for_short_code(&caller(2), "abc").await,
            Err(AppError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_code_not_found() {
        let mut urls = MockShortUrlRepository::new();
        urls.expect_find_by_code().returning(|_| Ok(None));

        let service = AnalyticsService::new(Arc::new(urls), Arc::new(MockClickRepository::new()));
        assert!(matches!(
            service.for_short_code(&caller(1), "nope").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_gets_summary_from_aggregates() {
        let mut urls = MockShortUrlRepository::new();
        urls.expect_find_by_code()
            .returning(|_| Ok(Some(short_url(1))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_by_short_url().returning(|_| Ok(3));
        clicks
            .expect_daily_counts()
            .returning(|_| Ok(vec![(day(2024, 1, 1), 2), (day(2024, 1, 2), 1)]));
        clicks
            .expect_recent()
            .withf(|id, limit| *id == 1 && *limit == RECENT_ACTIVITY_LIMIT)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    click(3, at(2024, 1, 2, 9), None),
                    click(2, at(2024, 1, 1, 9), Some("Oslo, Norway")),
                ])
            });
        clicks
            .expect_location_counts()
            .returning(|_| Ok(vec![("Oslo, Norway".to_string(), 2)]));

        let service = AnalyticsService::new(Arc::new(urls), Arc::new(clicks));
        let summary = service.for_short_code(&caller(1), "abc").await.unwrap();

        assert_eq!(summary.total_clicks, 3);
        assert_eq!(summary.avg_daily_clicks, 1);
        assert_eq!(summary.recent[0].id, 3);
        assert_eq!(summary.top_location(), Some("Oslo, Norway"));
    }
}
