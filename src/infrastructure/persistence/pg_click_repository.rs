//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    short_url_id: i64,
    click_time: DateTime<Utc>,
    ip: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    location: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click {
            id: row.id,
            short_url_id: row.short_url_id,
            click_time: row.click_time,
            ip: row.ip,
            user_agent: row.user_agent,
            referrer: row.referrer,
            location: row.location,
        }
    }
}

/// PostgreSQL repository for click events.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn insert(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO click_events (short_url_id, click_time, ip, user_agent, referrer, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, short_url_id, click_time, ip, user_agent, referrer, location
            "#,
        )
        .bind(new_click.short_url_id)
        .bind(new_click.click_time)
        .bind(&new_click.ip)
        .bind(&new_click.user_agent)
        .bind(&new_click.referrer)
        .bind(&new_click.location)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn daily_counts(&self, short_url_id: i64) -> Result<Vec<(NaiveDate, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
            SELECT (click_time AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS clicks
            FROM click_events
            WHERE short_url_id = $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(short_url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn location_counts(&self, short_url_id: i64) -> Result<Vec<(String, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT location, COUNT(*) AS clicks
            FROM click_events
            WHERE short_url_id = $1 AND location IS NOT NULL
            GROUP BY location
            ORDER BY clicks DESC, location
            "#,
        )
        .bind(short_url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn recent(&self, short_url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, short_url_id, click_time, ip, user_agent, referrer, location
            FROM click_events
            WHERE short_url_id = $1
            ORDER BY click_time DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(short_url_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_short_url(&self, short_url_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM click_events WHERE short_url_id = $1")
                .bind(short_url_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
