//! Handlers for signup, login and account approval.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserDto};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Errors
///
/// - **400**: invalid email, username outside 3-50 chars, password under 6 chars
/// - **409**: email or username already taken
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    let user = state.auth_service.signup(payload.into()).await?;

    let message = if user.approved {
        "User registered successfully"
    } else {
        "User registered successfully, awaiting admin approval"
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns **403** for unknown email, wrong password, or an unapproved account.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        user: UserDto::from(&user),
        token,
    }))
}

/// Lists accounts waiting for approval. Admin only.
///
/// `GET /auth/pending-users`
pub async fn pending_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = state.user_service.pending_users().await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

/// Approves an account by username. Admin only.
///
/// `POST /auth/approve-user/{username}`, **404** for an unknown username.
pub async fn approve_user_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = state.user_service.approve(&username).await?;
    Ok(Json(MessageResponse::new(format!(
        "User {} approved",
        user.username
    ))))
}
