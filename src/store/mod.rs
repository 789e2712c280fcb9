//! Store seams for the two external collaborators: the document database
//! holding user and media metadata, and the blob store holding binary
//! payloads. Handlers only see these traits; production wires in PostgreSQL
//! and S3, tests substitute in-memory doubles.

pub mod postgres;
pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::media::{MediaRecord, MediaType, MediaUpdate};
use crate::models::user::User;

/// Document database holding user and media metadata
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create_user(&self, user: &User) -> Result<()>;

    async fn create_media(&self, record: &MediaRecord) -> Result<()>;

    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>>;

    /// Case-insensitive substring match over original filename, description
    /// and tags, scoped to one user's media. Returns the page plus the total
    /// match count.
    async fn search_media(
        &self,
        user_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<MediaRecord>, i64)>;

    /// Paginated listing of one user's media, newest first, optionally
    /// filtered by media type.
    async fn get_user_media(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
        media_type: Option<MediaType>,
    ) -> Result<(Vec<MediaRecord>, i64)>;

    /// Apply the provided fields plus the new `updated_at` to a record owned
    /// by `user_id`. Returns None when no such record exists.
    async fn update_media(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &MediaUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<MediaRecord>>;

    /// Delete a record owned by `user_id`; returns whether a row was removed.
    async fn delete_media(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// A stored blob: storage-assigned name plus retrieval URL
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub name: String,
    pub url: String,
}

/// Binary object storage issuing retrieval URLs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a payload under a name scoped by the owning user.
    async fn upload_file(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob>;

    async fn delete_file(&self, name: &str) -> Result<()>;

    /// Recover the storage-assigned name from a previously issued URL.
    /// Records only persist URLs, so deletion goes through this.
    fn blob_name_for_url(&self, url: &str) -> Option<String>;
}
