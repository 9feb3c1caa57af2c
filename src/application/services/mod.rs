//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod quota_service;
pub mod url_service;
pub mod user_service;

pub use analytics_service::{AnalyticsService, UrlAnalytics};
pub use auth_service::{AuthService, AuthSettings, AuthUser, Claims, SignupInput};
pub use quota_service::QuotaService;
pub use url_service::UrlService;
pub use user_service::{Profile, UserService};
