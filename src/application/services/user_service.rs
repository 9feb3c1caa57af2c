//! Profile reads and updates, and account approval.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use super::auth_service::AuthUser;
use crate::domain::entities::User;
use crate::domain::repositories::{ShortUrlRepository, UserRepository};
use crate::error::AppError;

const USERNAME_MIN_LENGTH: usize = 3;
const USERNAME_MAX_LENGTH: usize = 50;

/// Usage summary of one account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub urls_created: i64,
    pub total_clicks: i64,
    pub member_since: DateTime<Utc>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    short_urls: Arc<dyn ShortUrlRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, short_urls: Arc<dyn ShortUrlRepository>) -> Self {
        Self { users, short_urls }
    }

    async fn load(&self, who: &AuthUser) -> Result<User, AppError> {
        self.users
            .find_by_id(who.id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unknown user", json!({})))
    }

    /// Returns the caller's profile with URL and click totals.
    pub async fn profile(&self, who: &AuthUser) -> Result<Profile, AppError> {
        let user = self.load(who).await?;
        let urls = self.short_urls.list_by_user_with_clicks(user.id).await?;

        Ok(Profile {
            username: user.username,
            email: user.email,
            urls_created: urls.len() as i64,
            total_clicks: urls.iter().map(|u| u.clicks).sum(),
            member_since: user.created_at,
        })
    }

    /// Changes the caller's username. `created_at` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the trimmed name is empty or out of
    /// bounds, and [`AppError::Conflict`] if another user has it.
    pub async fn update_username(&self, who: &AuthUser, username: &str) -> Result<Profile, AppError> {
        let username = username.trim();

        if username.is_empty() {
            return Err(AppError::bad_request(
                "Username cannot be empty",
                json!({ "field": "username" }),
            ));
        }
        let length = username.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::bad_request(
                format!(
                    "Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
                ),
                json!({ "field": "username" }),
            ));
        }

        if let Some(existing) = self.users.find_by_username(username).await?
            && existing.id != who.id
        {
            return Err(AppError::conflict(
                "Username is already taken",
                json!({ "field": "username" }),
            ));
        }

        self.users.update_username(who.id, username).await?;
        tracing::info!(user_id = who.id, "Username updated");

        self.profile(who).await
    }

    /// Accounts awaiting approval, oldest first.
    pub async fn pending_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list_pending().await
    }

    pub async fn all_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list_all().await
    }

    /// Approves an account so it can log in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown username.
    pub async fn approve(&self, username: &str) -> Result<User, AppError> {
        let user = self
            .users
            .approve(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "username": username })))?;

        tracing::info!(user_id = user.id, "User approved");
        Ok(user)
    }

    /// Grants the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown username.
    pub async fn promote(&self, username: &str) -> Result<User, AppError> {
        let user = self
            .users
            .promote_to_admin(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "username": username })))?;

        tracing::info!(user_id = user.id, "User promoted to admin");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Role, ShortUrl, ShortUrlWithClicks};
    use crate::domain::repositories::{MockShortUrlRepository, MockUserRepository};
    use chrono::TimeZone;

    fn joined() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 17, 9, 30, 0).unwrap()
    }

    fn stored_user(id: i64, username: &str) -> User {
        User {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: String::new(),
            role: Role::User,
            approved: true,
            created_at: joined(),
        }
    }

    fn me() -> AuthUser {
        AuthUser::from(&stored_user(1, "alice"))
    }

    fn with_clicks(id: i64, clicks: i64) -> ShortUrlWithClicks {
        ShortUrlWithClicks {
            url: ShortUrl {
                id,
                original_url: "https://example.com/".to_string(),
                short_code: format!("c{id}"),
                user_id: 1,
                created_at: Utc::now(),
            },
            clicks,
        }
    }

    #[tokio::test]
    async fn test_profile_totals() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user(1, "alice"))));
        let mut urls = MockShortUrlRepository::new();
        urls.expect_list_by_user_with_clicks()
            .returning(|_| Ok(vec![with_clicks(1, 3), with_clicks(2, 4)]));

        let service = UserService::new(Arc::new(users), Arc::new(urls));
        let profile = service.profile(&me()).await.unwrap();

        assert_eq!(profile.urls_created, 2);
        assert_eq!(profile.total_clicks, 7);
        assert_eq!(profile.member_since, joined());
    }

    #[tokio::test]
    async fn test_update_username_empty_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_update_username().times(0);

        let service = UserService::new(Arc::new(users), Arc::new(MockShortUrlRepository::new()));
        assert!(matches!(
            service.update_username(&me(), "   ").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_username_taken_by_other() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(stored_user(2, "bob"))));
        users.expect_update_username().times(0);

        let service = UserService::new(Arc::new(users), Arc::new(MockShortUrlRepository::new()));
        assert!(matches!(
            service.update_username(&me(), "bob").await,
            Err(AppError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_username_keeps_created_at() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_update_username()
            .withf(|id, name| *id == 1 && name == "alicia")
            .times(1)
            .returning(|_, name| Ok(stored_user(1, name)));
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user(1, "alicia"))));
        let mut urls = MockShortUrlRepository::new();
        urls.expect_list_by_user_with_clicks().returning(|_| Ok(vec![]));

        let service = UserService::new(Arc::new(users), Arc::new(urls));
        let profile = service.update_username(&me(), "  alicia ").await.unwrap();

        assert_eq!(profile.username, "alicia");
        assert_eq!(profile.member_since, joined());
    }

    #[tokio::test]
    async fn test_approve_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_approve().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(users), Arc::new(MockShortUrlRepository::new()));
        assert!(matches!(
            service.approve("ghost").await,
            Err(AppError::NotFound { .. })
        ));
    }
}
