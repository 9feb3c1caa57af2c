#![allow(dead_code)]

pub mod memory;

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tinylink::api::routes::router;
use tinylink::application::services::AuthSettings;
use tinylink::domain::click_event::ClickEvent;
use tinylink::domain::clock::SystemClock;
use tinylink::domain::entities::{NewClick, NewUser, Role};
use tinylink::domain::repositories::{ClickRepository, UserRepository};
use tinylink::infrastructure::cache::{CacheResult, CacheService, CachedLink, NullCache};
use tinylink::state::{AppSettings, AppState, Repositories};
use tinylink::utils::code_generator::RandomCodeGenerator;
use tinylink::utils::password::hash_password;
use tokio::sync::mpsc;
use tower::Layer;

use memory::MemoryStore;

pub const BASE_URL: &str = "http://sho.rt";
pub const PASSWORD: &str = "secret-pass";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// In-process counter cache so quota behaviour can be exercised without Redis.
#[derive(Default)]
pub struct CountingCache {
    counters: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl CacheService for CountingCache {
    async fn get_link(&self, _short_code: &str) -> CacheResult<Option<CachedLink>> {
        Ok(None)
    }

    async fn set_link(&self, _: &str, _: &CachedLink, _: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn incr_with_expiry(&self, key: &str, _window_seconds: u64) -> CacheResult<Option<u64>> {
        let mut counters = self.counters.lock().unwrap();
        let value = counters.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(Some(*value))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

pub fn test_settings() -> AppSettings {
    AppSettings {
        auth: AuthSettings {
            jwt_secret: "test-signing-secret".to_string(),
            token_ttl_seconds: 3600,
            auto_approve_users: true,
        },
        base_url: BASE_URL.to_string(),
        shorten_daily_limit: 100,
    }
}

pub fn create_test_state(
    store: Arc<MemoryStore>,
    cache: Arc<dyn CacheService>,
    settings: AppSettings,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let repos = Repositories {
        users: store.clone(),
        short_urls: store.clone(),
        clicks: store,
    };

    let state = AppState::new(
        repos,
        cache,
        Arc::new(SystemClock),
        Arc::new(RandomCodeGenerator),
        settings,
        tx,
    );

    (state, rx)
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub clicks_rx: mpsc::Receiver<ClickEvent>,
}

pub fn spawn_app_with(cache: Arc<dyn CacheService>, settings: AppSettings) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (state, clicks_rx) = create_test_state(store.clone(), cache, settings);

    let app: Router = router(state).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        store,
        clicks_rx,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(NullCache::new()), test_settings())
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

impl TestApp {
    pub async fn signup(&self, username: &str) {
        self.server
            .post("/auth/signup")
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            }))
            .await
            .assert_status_ok();
    }

    pub async fn login(&self, username: &str) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Signs up and logs in, returning a bearer token.
    pub async fn register(&self, username: &str) -> String {
        self.signup(username).await;
        self.login(username).await
    }

    /// Creates an approved admin directly in the store and logs in.
    pub async fn register_admin(&self, username: &str) -> String {
        UserRepository::create(
            self.store.as_ref(),
            NewUser {
                email: format!("{username}@example.com"),
                username: username.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                role: Role::Admin,
                approved: true,
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        self.login(username).await
    }

    /// Shortens a URL, returning the response body.
    pub async fn shorten(&self, token: &str, url: &str, custom_code: Option<&str>) -> Value {
        let response = self
            .server
            .post("/url/shorten")
            .add_header("Authorization", bearer(token))
            .json(&json!({ "originalUrl": url, "customCode": custom_code }))
            .await;

        response.assert_status_ok();
        response.json::<Value>()
    }

    pub async fn seed_click(
        &self,
        short_url_id: i64,
        click_time: DateTime<Utc>,
        location: Option<&str>,
    ) {
        self.store
            .insert(NewClick {
                short_url_id,
                click_time,
                ip: Some("203.0.113.7".to_string()),
                user_agent: Some("TestBot/1.0".to_string()),
                referrer: None,
                location: location.map(str::to_string),
            })
            .await
            .unwrap();
    }
}
