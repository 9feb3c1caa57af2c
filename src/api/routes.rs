//! API route configuration.
//!
//! Routes are grouped by the guard they need. Rate limiting is applied on
//! top of these groups by [`crate::routes::app_router`].

use crate::api::handlers::{
    analytics_handler, approve_user_handler, delete_url_handler, get_profile_handler,
    get_url_handler, health_handler, login_handler, my_urls_handler, pending_users_handler,
    redirect_handler, shorten_handler, signup_handler, update_profile_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Unauthenticated account endpoints.
///
/// - `POST /auth/signup` - Register an account
/// - `POST /auth/login`  - Exchange credentials for a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
}

/// Endpoints for any approved user, protected by Bearer token authentication.
///
/// - `POST   /url/shorten`             - Create a short URL
/// - `GET    /url/my-urls`             - List own URLs with click counts
/// - `GET    /url/{id}`                - One own URL
/// - `DELETE /url/{id}`                - Delete an own URL
/// - `GET    /analytics/{short_code}`  - Click analytics for an own URL
/// - `GET    /user/profile`            - Profile with usage totals
/// - `PUT    /user/profile`            - Change username
pub fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/url/shorten", post(shorten_handler))
        .route("/url/my-urls", get(my_urls_handler))
        .route("/url/{id}", get(get_url_handler).delete(delete_url_handler))
        .route("/analytics/{short_code}", get(analytics_handler))
        .route(
            "/user/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
}

/// Account approval endpoints, restricted to the `ADMIN` role.
///
/// - `GET  /auth/pending-users`            - Accounts awaiting approval
/// - `POST /auth/approve-user/{username}`  - Approve an account
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/pending-users", get(pending_users_handler))
        .route("/auth/approve-user/{username}", post(approve_user_handler))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
}

/// The JSON API: account, URL, analytics and profile endpoints.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(protected_routes(state))
        .merge(admin_routes(state))
}

/// Public, high-volume endpoints.
///
/// - `GET /{code}`  - Short link redirect
/// - `GET /health`  - Health check: DB, cache, click queue
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}

/// Every route with state applied and no rate limiting.
///
/// The redirect handler needs `ConnectInfo<SocketAddr>`, so the router must
/// be served with connect info (or given a `MockConnectInfo` layer in tests).
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes(&state))
        .merge(public_routes())
        .with_state(state)
}
