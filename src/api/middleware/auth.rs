//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::AuthUser;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify the HS256 signature and expiry
/// 3. Resolve the token subject to an approved user
/// 4. Attach the [`AuthUser`] to the request extensions
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, the token is
/// malformed, badly signed, expired, or names an unknown user.
/// Returns `403 Forbidden` if the account is no longer approved.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/url/my-urls", get(my_urls_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));
/// ```
pub async fn require_auth(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthenticated(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Rejects callers without the `ADMIN` role.
///
/// Must run after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = req
        .extensions()
        .get::<AuthUser>()
        .is_some_and(AuthUser::is_admin);

    if !is_admin {
        return Err(AppError::forbidden(
            "Admin role required",
            json!({ "path": req.uri().path() }),
        ));
    }

    Ok(next.run(req).await)
}
