//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code, cache first, then the database
/// 2. Build a click event stamped with the request time
/// 3. Queue the event for the background worker
/// 4. Return 302 Found
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel. If the queue is full or
/// closed the click is dropped with a warning; the redirect still succeeds.
/// Geolocation happens in the worker, never on this path.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist. No click is
/// recorded in that case.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let clicked_at = state.clock.now();

    let link = state.url_service.resolve(&code).await?;

    let click_event = ClickEvent::new(
        link.id,
        code,
        clicked_at,
        Some(client_ip(&headers, addr)),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.click_sender.try_send(click_event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(short_code = %event.short_code, "Click queue full, dropping event");
        }
        Err(TrySendError::Closed(event)) => {
            tracing::warn!(short_code = %event.short_code, "Click queue closed, dropping event");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, link.original_url)]))
}
