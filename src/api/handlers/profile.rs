//! Handlers for reading and updating the caller's profile.

use axum::{Extension, Json, extract::State};

use crate::api::dto::profile::{ProfileResponse, UpdateProfileRequest};
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /user/profile`
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.user_service.profile(&user).await?;
    Ok(Json(profile.into()))
}

/// Changes the caller's username.
///
/// `PUT /user/profile`; **400** for an empty name, **409** if it is taken.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .user_service
        .update_username(&user, &payload.username)
        .await?;

    Ok(Json(profile.into()))
}
