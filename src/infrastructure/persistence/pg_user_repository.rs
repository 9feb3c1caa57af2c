//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, email, username, password_hash, role, approved, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password_hash: String,
    role: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| AppError::internal(e, json!({ "user_id": row.id })))?;

        Ok(User {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            role,
            approved: row.approved,
            created_at: row.created_at,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, AppError> {
    rows.into_iter().map(User::try_from).collect()
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (email, username, password_hash, role, approved, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .bind(new_user.approved)
            .bind(new_user.created_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_by("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_by("username", username).await
    }

    async fn update_username(&self, id: i64, username: &str) -> Result<User, AppError> {
        let sql = format!("UPDATE users SET username = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?
            .try_into()
    }

    async fn list_pending(&self) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE approved = FALSE ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_users(rows)
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_users(rows)
    }

    async fn approve(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET approved = TRUE WHERE username = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn promote_to_admin(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET role = 'ADMIN' WHERE username = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }
}
