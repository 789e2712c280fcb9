//! PostgreSQL implementation of the document store

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::media::{MediaRecord, MediaType, MediaUpdate};
use crate::models::user::User;
use crate::store::DocumentStore;

const MEDIA_COLUMNS: &str = "id, user_id, file_name, original_file_name, media_type, file_size, \
                             mime_type, blob_url, thumbnail_url, description, tags, uploaded_at, \
                             updated_at";

/// Document store backed by PostgreSQL
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn row_to_media(row: &PgRow) -> Result<MediaRecord> {
    let media_type: String = row.get("media_type");
    let media_type = MediaType::from_str(&media_type).map_err(|e| anyhow::anyhow!(e))?;

    Ok(MediaRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        file_name: row.get("file_name"),
        original_file_name: row.get("original_file_name"),
        media_type,
        file_size: row.get("file_size"),
        mime_type: row.get("mime_type"),
        blob_url: row.get("blob_url"),
        thumbnail_url: row.get("thumbnail_url"),
        description: row.get("description"),
        tags: row.get("tags"),
        uploaded_at: row.get("uploaded_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_media(&self, record: &MediaRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO media (id, user_id, file_name, original_file_name, media_type,
                               file_size, mime_type, blob_url, thumbnail_url, description,
                               tags, uploaded_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.file_name)
        .bind(&record.original_file_name)
        .bind(record.media_type.as_str())
        .bind(record.file_size)
        .bind(&record.mime_type)
        .bind(&record.blob_url)
        .bind(&record.thumbnail_url)
        .bind(&record.description)
        .bind(&record.tags)
        .bind(record.uploaded_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM media WHERE id = $1",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_media).transpose()
    }

    async fn search_media(
        &self,
        user_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<MediaRecord>, i64)> {
        let pattern = format!("%{}%", query);
        let offset = (page as i64 - 1) * page_size as i64;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM media
            WHERE user_id = $1
              AND (original_file_name ILIKE $2
                   OR description ILIKE $2
                   OR tags::text ILIKE $2)
            ORDER BY uploaded_at DESC
            LIMIT $3 OFFSET $4
            "#,
            MEDIA_COLUMNS
        ))
        .bind(user_id)
        .bind(&pattern)
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM media
            WHERE user_id = $1
              AND (original_file_name ILIKE $2
                   OR description ILIKE $2
                   OR tags::text ILIKE $2)
            "#,
        )
        .bind(user_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let items = rows.iter().map(row_to_media).collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn get_user_media(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
        media_type: Option<MediaType>,
    ) -> Result<(Vec<MediaRecord>, i64)> {
        let offset = (page as i64 - 1) * page_size as i64;

        let (rows, total) = match media_type {
            Some(media_type) => {
                let rows = sqlx::query(&format!(
                    r#"
                    SELECT {}
                    FROM media
                    WHERE user_id = $1 AND media_type = $2
                    ORDER BY uploaded_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                    MEDIA_COLUMNS
                ))
                .bind(user_id)
                .bind(media_type.as_str())
                .bind(page_size as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM media WHERE user_id = $1 AND media_type = $2",
                )
                .bind(user_id)
                .bind(media_type.as_str())
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query(&format!(
                    r#"
                    SELECT {}
                    FROM media
                    WHERE user_id = $1
                    ORDER BY uploaded_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                    MEDIA_COLUMNS
                ))
                .bind(user_id)
                .bind(page_size as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM media WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;

                (rows, total)
            }
        };

        let items = rows.iter().map(row_to_media).collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update_media(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &MediaUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<MediaRecord>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE media
            SET updated_at = $3,
                description = COALESCE($4, description),
                tags = COALESCE($5, tags)
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(updated_at)
        .bind(&changes.description)
        .bind(&changes.tags)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_media).transpose()
    }

    async fn delete_media(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
