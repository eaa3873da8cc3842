use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// Every query below is scoped by user_id; ownership is enforced in the
// WHERE clause, never checked after the row is loaded.
impl Bookmark {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Bookmark>, ApiError> {
        let rows = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, link, description, created_at, updated_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Bookmark>, ApiError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, link, description, created_at, updated_at
            FROM bookmarks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        link: &str,
        description: Option<&str>,
    ) -> Result<Bookmark, ApiError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, title, link, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, link, description, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(link)
        .bind(description)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial update; absent fields keep their current value. Returns
    /// None when the bookmark doesn't exist or belongs to someone else.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        title: Option<&str>,
        link: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Bookmark>, ApiError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            UPDATE bookmarks
            SET title       = COALESCE($3, title),
                link        = COALESCE($4, link),
                description = COALESCE($5, description),
                updated_at  = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, link, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(link)
        .bind(description)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Returns false when nothing was deleted (missing or not owned).
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM bookmarks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
