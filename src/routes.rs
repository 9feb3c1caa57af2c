//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Health check: DB, cache, click queue (public)
//! - `/auth/*`        - Signup, login, and admin approval
//! - `/url/*`, `/analytics/*`, `/user/*` - Bearer token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token, applied per route group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = api::routes::api_routes(&state);
    let public_router = api::routes::public_routes();

    let (api_router, public_router) = if behind_proxy {
        (
            api_router.layer(rate_limit::proxied_secure_layer()),
            public_router.layer(rate_limit::proxied_layer()),
        )
    } else {
        (
            api_router.layer(rate_limit::secure_layer()),
            public_router.layer(rate_limit::layer()),
        )
    };

    let router = Router::new()
        .merge(api_router)
        .merge(public_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
