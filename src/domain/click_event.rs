//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// A click captured by the redirect handler and queued for persistence.
///
/// Passed to the background worker over a bounded channel so the redirect
/// response never waits on geolocation or database writes.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler, stamped with the request time
/// 2. Sent to the channel with `try_send`
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Converted to [`crate::domain::entities::NewClick`] once the location is resolved
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub short_url_id: i64,
    pub short_code: String,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     "abc123".to_string(),
    ///     clock.now(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     None,
    /// );
    /// ```
    pub fn new(
        short_url_id: i64,
        short_code: String,
        clicked_at: DateTime<Utc>,
        ip: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Self {
        Self {
            short_url_id,
            short_code,
            clicked_at,
            ip,
            user_agent: user_agent.map(str::to_string),
            referrer: referrer.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let now = Utc::now();
        let event = ClickEvent::new(
            7,
            "abc123".to_string(),
            now,
            Some("192.168.1.1".to_string()),
            Some("Mozilla/5.0"),
            Some("https://google.com"),
        );

        assert_eq!(event.short_url_id, 7);
        assert_eq!(event.short_code, "abc123");
        assert_eq!(event.clicked_at, now);
        assert_eq!(event.ip.as_deref(), Some("192.168.1.1"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referrer.as_deref(), Some("https://google.com"));
    }

    #[test]
    fn test_click_event_creation_minimal() {
        let event = ClickEvent::new(1, "xyz".to_string(), Utc::now(), None, None, None);

        assert!(event.ip.is_none());
        assert!(event.user_agent.is_none());
        assert!(event.referrer.is_none());
    }
}
