//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlWithClicks};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShortUrlClicksRow {
    #[sqlx(flatten)]
    url: ShortUrlRow,
    clicks: i64,
}

/// PostgreSQL repository for short URLs.
///
/// Uniqueness of `short_code` is enforced by the table's unique index;
/// violations surface as [`AppError::Conflict`].
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            INSERT INTO short_urls (original_url, short_code, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, short_code, user_id, created_at
            "#,
        )
        .bind(&new_url.original_url)
        .bind(&new_url.short_code)
        .bind(new_url.user_id)
        .bind(new_url.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, original_url, short_code, user_id, created_at
            FROM short_urls
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, original_url, short_code, user_id, created_at
            FROM short_urls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM short_urls WHERE short_code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list_by_user_with_clicks(
        &self,
        user_id: i64,
    ) -> Result<Vec<ShortUrlWithClicks>, AppError> {
        let rows = sqlx::query_as::<_, ShortUrlClicksRow>(
            r#"
            SELECT s.id, s.original_url, s.short_code, s.user_id, s.created_at,
                   COUNT(c.id) AS clicks
            FROM short_urls s
            LEFT JOIN click_events c ON c.short_url_id = s.id
            WHERE s.user_id = $1
            GROUP BY s.id
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ShortUrlWithClicks {
                url: r.url.into(),
                clicks: r.clicks,
            })
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
