//! Media models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of a stored media object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

/// Media record as persisted in the document store and returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Storage-assigned blob name, scoped by the owning user
    pub file_name: String,
    pub original_file_name: String,
    pub media_type: MediaType,
    pub file_size: i64,
    pub mime_type: String,
    pub blob_url: String,
    /// Only set for images, and only when thumbnail generation succeeded
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    /// JSON array as uploaded; elements round-trip verbatim
    pub tags: Option<serde_json::Value>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for metadata updates; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct MediaUpdate {
    pub description: Option<String>,
    pub tags: Option<serde_json::Value>,
}

/// Query parameters for media listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub media_type: Option<String>,
}

/// Query parameters for media search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSearchQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Paginated media response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListResponse {
    pub items: Vec<MediaRecord>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}
