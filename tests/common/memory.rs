//! In-process storage for the HTTP handler tests.
//!
//! Implements every repository trait over shared maps guarded by a single
//! lock, with the same uniqueness and foreign-key rules as the PostgreSQL
//! schema. The SQL itself is covered by `tests/repository_pg.rs`.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use tinylink::domain::entities::{
    Click, NewClick, NewShortUrl, NewUser, Role, ShortUrl, ShortUrlWithClicks, User,
};
use tinylink::domain::repositories::{ClickRepository, ShortUrlRepository, UserRepository};
use tinylink::AppError;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    short_urls: BTreeMap<i64, ShortUrl>,
    clicks: BTreeMap<i64, Click>,
    next_user_id: i64,
    next_url_id: i64,
    next_click_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn user_by_username_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.values_mut().find(|u| u.username == username)
    }

    fn clicks_of(&self, short_url_id: i64) -> impl Iterator<Item = &Click> {
        self.clicks
            .values()
            .filter(move |c| c.short_url_id == short_url_id)
    }

    fn click_count(&self, short_url_id: i64) -> i64 {
        self.clicks_of(short_url_id).count() as i64
    }
}

/// Repository implementation backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": constraint }),
    )
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(unique_violation("users_email_key"));
        }
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(unique_violation("users_username_key"));
        }

        let id = Tables::next_id(&mut tables.next_user_id);
        let user = User {
            id,
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            role: new_user.role,
            approved: new_user.approved,
            created_at: new_user.created_at,
        };
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_username(&self, id: i64, username: &str) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == username && u.id != id)
        {
            return Err(unique_violation("users_username_key"));
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;
        user.username = username.to_string();

        Ok(user.clone())
    }

    async fn list_pending(&self) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let mut pending: Vec<User> = tables.users.values().filter(|u| !u.approved).cloned().collect();
        pending.sort_by_key(|u| (u.created_at, u.id));
        Ok(pending)
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn approve(&self, username: &str) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.user_by_username_mut(username).map(|u| {
            u.approved = true;
            u.clone()
        }))
    }

    async fn promote_to_admin(&self, username: &str) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.user_by_username_mut(username).map(|u| {
            u.role = Role::Admin;
            u.clone()
        }))
    }
}

#[async_trait]
impl ShortUrlRepository for MemoryStore {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_url.user_id) {
            return Err(AppError::internal(
                "Owning user does not exist",
                json!({ "user_id": new_url.user_id }),
            ));
        }
        if tables
            .short_urls
            .values()
            .any(|u| u.short_code == new_url.short_code)
        {
            return Err(unique_violation("short_urls_short_code_key"));
        }

        let id = Tables::next_id(&mut tables.next_url_id);
        let url = ShortUrl {
            id,
            original_url: new_url.original_url,
            short_code: new_url.short_code,
            user_id: new_url.user_id,
            created_at: new_url.created_at,
        };
        tables.short_urls.insert(id, url.clone());

        Ok(url)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .short_urls
            .values()
            .find(|u| u.short_code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        Ok(self.tables.read().await.short_urls.get(&id).cloned())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.short_urls.values().any(|u| u.short_code == code))
    }

    async fn list_by_user_with_clicks(
        &self,
        user_id: i64,
    ) -> Result<Vec<ShortUrlWithClicks>, AppError> {
        let tables = self.tables.read().await;
        let mut urls: Vec<ShortUrlWithClicks> = tables
            .short_urls
            .values()
            .filter(|u| u.user_id == user_id)
            .map(|u| ShortUrlWithClicks {
                url: u.clone(),
                clicks: tables.click_count(u.id),
            })
            .collect();
        urls.sort_by(|a, b| {
            (b.url.created_at, b.url.id).cmp(&(a.url.created_at, a.url.id))
        });
        Ok(urls)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.short_urls.remove(&id).is_none() {
            return Ok(false);
        }
        tables.clicks.retain(|_, c| c.short_url_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().await.short_urls.len() as i64)
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn insert(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.short_urls.contains_key(&new_click.short_url_id) {
            return Err(AppError::internal(
                "Short URL does not exist",
                json!({ "short_url_id": new_click.short_url_id }),
            ));
        }

        let id = Tables::next_id(&mut tables.next_click_id);
        let click = Click {
            id,
            short_url_id: new_click.short_url_id,
            click_time: new_click.click_time,
            ip: new_click.ip,
            user_agent: new_click.user_agent,
            referrer: new_click.referrer,
            location: new_click.location,
        };
        tables.clicks.insert(id, click.clone());

        Ok(click)
    }

    async fn daily_counts(&self, short_url_id: i64) -> Result<Vec<(NaiveDate, i64)>, AppError> {
        let tables = self.tables.read().await;
        let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for click in tables.clicks_of(short_url_id) {
            *days.entry(click.click_time.date_naive()).or_insert(0) += 1;
        }
        Ok(days.into_iter().collect())
    }

    async fn location_counts(&self, short_url_id: i64) -> Result<Vec<(String, i64)>, AppError> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for location in tables
            .clicks_of(short_url_id)
            .filter_map(|c| c.location.as_deref())
        {
            *counts.entry(location).or_insert(0) += 1;
        }

        let mut breakdown: Vec<(String, i64)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(breakdown)
    }

    async fn recent(&self, short_url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let tables = self.tables.read().await;
        let mut clicks: Vec<Click> = tables.clicks_of(short_url_id).cloned().collect();
        clicks.sort_by(|a, b| (b.click_time, b.id).cmp(&(a.click_time, a.id)));
        clicks.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(clicks)
    }

    async fn count_by_short_url(&self, short_url_id: i64) -> Result<i64, AppError> {
        Ok(self.tables.read().await.click_count(short_url_id))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().await.clicks.len() as i64)
    }
}
