//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, AuthService, AuthSettings, QuotaService, UrlService, UserService,
};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::repositories::{ClickRepository, ShortUrlRepository, UserRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Storage backends behind the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub short_urls: Arc<dyn ShortUrlRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

/// Service settings derived from [`Config`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub auth: AuthSettings,
    pub base_url: String,
    pub shorten_daily_limit: u64,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            auth: AuthSettings {
                jwt_secret: config.jwt_secret.clone(),
                token_ttl_seconds: config.jwt_ttl_seconds,
                auto_approve_users: config.auto_approve_users,
            },
            base_url: config.base_url.clone(),
            shorten_daily_limit: config.shorten_daily_limit,
        }
    }
}

/// Services and handles shared across requests.
///
/// Cloning is cheap: every field is an `Arc` or a channel sender.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub url_service: Arc<UrlService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub user_service: Arc<UserService>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub clock: Arc<dyn Clock>,
    /// Store used by the health check to verify database connectivity.
    pub store_probe: Arc<dyn ShortUrlRepository>,
}

impl AppState {
    /// Wires the services over the given backends.
    pub fn new(
        repos: Repositories,
        cache: Arc<dyn CacheService>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn CodeGenerator>,
        settings: AppSettings,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        let quota = Arc::new(QuotaService::new(
            cache.clone(),
            settings.shorten_daily_limit,
        ));

        let url_service = UrlService::new(
            repos.short_urls.clone(),
            repos.clicks.clone(),
            cache.clone(),
            quota,
            codes,
            clock.clone(),
            settings.base_url,
        );

        Self {
            auth_service: Arc::new(AuthService::new(
                repos.users.clone(),
                clock.clone(),
                settings.auth,
            )),
            url_service: Arc::new(url_service),
            analytics_service: Arc::new(AnalyticsService::new(
                repos.short_urls.clone(),
                repos.clicks.clone(),
            )),
            user_service: Arc::new(UserService::new(repos.users, repos.short_urls.clone())),
            cache,
            click_sender,
            clock,
            store_probe: repos.short_urls,
        }
    }
}
