//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! receive the request identity explicitly from handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Signup, login and token verification
//! - [`services::url_service::UrlService`] - Short URL creation, resolution and deletion
//! - [`services::analytics_service::AnalyticsService`] - Per-URL click analytics
//! - [`services::user_service::UserService`] - Profiles and account approval
//! - [`services::quota_service::QuotaService`] - Daily shorten quota

pub mod services;
