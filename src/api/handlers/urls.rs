//! Handlers for creating, listing and deleting the caller's short URLs.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::auth::MessageResponse;
use crate::api::dto::url::{ShortenRequest, UrlResponse};
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL owned by the caller.
///
/// # Endpoint
///
/// `POST /url/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/page", "customCode": "promo" }
/// ```
///
/// `customCode` is optional; an empty string means "generate one".
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "originalUrl": "https://example.com/page",
///   "shortUrl": "http://localhost:3000/promo",
///   "shortCode": "promo",
///   "clicks": 0,
///   "createdAt": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - **400**: invalid URL or custom code
/// - **409**: custom code already in use
/// - **429**: daily shorten quota exhausted
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    payload.validate()?;

    let url = state
        .url_service
        .shorten(&user, &payload.original_url, payload.custom_code.as_deref())
        .await?;

    let short_url = state.url_service.short_url_for(&url.short_code);
    Ok(Json(UrlResponse::new(url, 0, short_url)))
}

/// Lists the caller's short URLs, newest first, with click counts.
///
/// `GET /url/my-urls`
pub async fn my_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UrlResponse>>, AppError> {
    let urls = state.url_service.list_for_owner(&user).await?;

    let items = urls
        .into_iter()
        .map(|item| {
            let short_url = state.url_service.short_url_for(&item.url.short_code);
            UrlResponse::from_with_clicks(item, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Returns one of the caller's short URLs.
///
/// `GET /url/{id}`, **403** when the id is unknown or owned by someone else.
pub async fn get_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<UrlResponse>, AppError> {
    let item = state.url_service.get_for_owner(&user, id).await?;
    let short_url = state.url_service.short_url_for(&item.url.short_code);

    Ok(Json(UrlResponse::from_with_clicks(item, short_url)))
}

/// Deletes one of the caller's short URLs and its click history.
///
/// `DELETE /url/{id}`
///
/// # Errors
///
/// - **403**: the URL belongs to another user; nothing is deleted
/// - **404**: unknown id
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.url_service.delete_for_owner(&user, id).await?;
    Ok(Json(MessageResponse::new("URL deleted successfully")))
}
