//! Handler for per-URL click analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one of the caller's short codes.
///
/// # Endpoint
///
/// `GET /analytics/{short_code}`
///
/// # Response
///
/// ```json
/// {
///   "urlData": { "originalUrl": "...", "shortCode": "abc123", "shortUrl": "...", "totalClicks": 3, "createdAt": "..." },
///   "clicksData": { "2024-01-01": 2, "2024-01-02": 1 },
///   "recentActivity": [ { "time": "...", "ip": "...", "device": "Mozilla/5.0", "referrer": null, "location": "Paris, France" } ],
///   "avgDailyClicks": 1,
///   "locationData": [ { "location": "Paris, France", "clicks": 3 } ],
///   "topLocation": "Paris, France",
///   "deviceData": { "status": "not_measured" },
///   "growthRate": { "status": "not_measured" }
/// }
/// ```
///
/// # Errors
///
/// - **403**: the short code belongs to another user
/// - **404**: unknown short code
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(short_code): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let analytics = state
        .analytics_service
        .for_short_code(&user, &short_code)
        .await?;

    let short_url = state.url_service.short_url_for(&analytics.url.short_code);
    Ok(Json(AnalyticsResponse::new(analytics, short_url)))
}
