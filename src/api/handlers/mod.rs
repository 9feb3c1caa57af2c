//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod profile;
pub mod redirect;
pub mod urls;

pub use analytics::analytics_handler;
pub use auth::{approve_user_handler, login_handler, pending_users_handler, signup_handler};
pub use health::health_handler;
pub use profile::{get_profile_handler, update_profile_handler};
pub use redirect::redirect_handler;
pub use urls::{delete_url_handler, get_url_handler, my_urls_handler, shorten_handler};
