//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkStatus};
use crate::domain::repositories::{LinkChanges, LinkRepository};
use crate::error::AppError;

/// PostgreSQL store for links.
///
/// `links.id` is the primary key, so conditional writes are plain
/// `WHERE id = .. AND owner_id = ..` statements and the affected-row count
/// reports whether the condition matched. Individual statements are atomic;
/// nothing here opens a transaction.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    owner_id: String,
    name: String,
    destination_url: String,
    status: String,
    redirect_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let status = LinkStatus::parse(&row.status).ok_or_else(|| {
            AppError::unexpected(
                "Stored link has an unknown status",
                json!({ "id": row.id, "status": row.status }),
            )
        })?;

        Ok(Link {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            destination_url: row.destination_url,
            status,
            redirect_count: row.redirect_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const LINK_COLUMNS: &str =
    "id, owner_id, name, destination_url, status, redirect_count, created_at, updated_at";

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        status: Option<LinkStatus>,
    ) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE owner_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Link::try_from).collect()
    }

    async fn insert(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO links \
             (id, owner_id, name, destination_url, status, redirect_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&link.id)
        .bind(&link.owner_id)
        .bind(&link.name)
        .bind(&link.destination_url)
        .bind(link.status.as_str())
        .bind(link.redirect_count)
        .bind(link.created_at)
        .bind(link.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        owner_id: &str,
        changes: &LinkChanges,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links \
             SET name = $3, destination_url = $4, status = $5, updated_at = $6 \
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.name)
        .bind(&changes.destination_url)
        .bind(changes.status.as_str())
        .bind(changes.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_redirect_count(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET redirect_count = redirect_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
