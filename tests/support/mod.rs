//! In-memory store doubles and request helpers shared by the API tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use media_vault::jwt::TokenService;
use media_vault::models::media::{MediaRecord, MediaType, MediaUpdate};
use media_vault::models::user::User;
use media_vault::routes::create_router;
use media_vault::state::AppState;
use media_vault::store::{BlobStore, DocumentStore, StoredBlob};

const BLOB_BASE: &str = "https://blobs.test";
const BOUNDARY: &str = "test-boundary-7f3a9c";

/// In-memory document store
#[derive(Default)]
pub struct MemoryDocumentStore {
    users: Mutex<Vec<User>>,
    media: Mutex<Vec<MediaRecord>>,
}

fn paginate(mut items: Vec<MediaRecord>, page: u32, page_size: u32) -> (Vec<MediaRecord>, i64) {
    items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    let total = items.len() as i64;
    let start = ((page - 1) * page_size) as usize;
    let page_items = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    (page_items, total)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn create_media(&self, record: &MediaRecord) -> Result<()> {
        self.media.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>> {
        Ok(self
            .media
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn search_media(
        &self,
        user_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<MediaRecord>, i64)> {
        let needle = query.to_lowercase();
        let matches: Vec<MediaRecord> = self
            .media
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                m.user_id == user_id
                    && (m.original_file_name.to_lowercase().contains(&needle)
                        || m.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle))
                        || m.tags
                            .as_ref()
                            .is_some_and(|t| t.to_string().to_lowercase().contains(&needle)))
            })
            .cloned()
            .collect();

        Ok(paginate(matches, page, page_size))
    }

    async fn get_user_media(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
        media_type: Option<MediaType>,
    ) -> Result<(Vec<MediaRecord>, i64)> {
        let matches: Vec<MediaRecord> = self
            .media
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && media_type.map_or(true, |t| m.media_type == t))
            .cloned()
            .collect();

        Ok(paginate(matches, page, page_size))
    }

    async fn update_media(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &MediaUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<MediaRecord>> {
        let mut media = self.media.lock().unwrap();
        let Some(record) = media
            .iter_mut()
            .find(|m| m.id == id && m.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(description) = &changes.description {
            record.description = Some(description.clone());
        }
        if let Some(tags) = &changes.tags {
            record.tags = Some(tags.clone());
        }
        record.updated_at = updated_at;

        Ok(Some(record.clone()))
    }

    async fn delete_media(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut media = self.media.lock().unwrap();
        let before = media.len();
        media.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(media.len() < before)
    }
}

/// In-memory blob store that records every upload and delete
#[derive(Default)]
pub struct MemoryBlobStore {
    pub blobs: Mutex<HashMap<String, usize>>,
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

impl MemoryBlobStore {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    /// Drop a blob behind the service's back, so the next delete fails
    pub fn remove_blob(&self, name: &str) {
        self.blobs.lock().unwrap().remove(name);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload_file(
        &self,
        user_id: Uuid,
        file_name: &str,
        _content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob> {
        let name = format!("{}/{}", user_id, file_name);
        self.uploads.lock().unwrap().push(name.clone());
        self.blobs.lock().unwrap().insert(name.clone(), data.len());

        let url = format!("{}/{}", BLOB_BASE, name);
        Ok(StoredBlob { name, url })
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(name.to_string());
        self.blobs
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow!("no such blob: {}", name))
    }

    fn blob_name_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", BLOB_BASE))
            .map(str::to_string)
    }
}

/// Router plus handles on the store doubles behind it
pub struct TestApp {
    pub router: Router,
    pub documents: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

pub fn test_app() -> TestApp {
    test_app_with_limit(10 * 1024 * 1024)
}

pub fn test_app_with_limit(max_upload_bytes: usize) -> TestApp {
    let documents = Arc::new(MemoryDocumentStore::default());
    let blobs = Arc::new(MemoryBlobStore::default());

    let state = AppState {
        documents: documents.clone() as Arc<dyn DocumentStore>,
        blobs: blobs.clone() as Arc<dyn BlobStore>,
        tokens: TokenService::new("test-secret", 3600),
        max_upload_bytes,
    };

    TestApp {
        router: create_router(state),
        documents,
        blobs,
    }
}

/// Send a request and return (status, parsed JSON body or Null)
pub async fn send(router: &Router, req: Request<Body>) -> (u16, Value) {
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status().as_u16();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// One multipart form part; `file_name`/`content_type` are only set for files
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }

    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }
}

pub fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

/// Register a user and return the access token
pub async fn register_user(app: &TestApp, username: &str, email: &str) -> String {
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({
                "username": username,
                "email": email,
                "password": "hunter2hunter2",
            }),
        ),
    )
    .await;
    assert_eq!(status, 200, "registration failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// A small but real PNG the thumbnail pipeline can decode
pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Upload an image file and return the created record
pub async fn upload_image(
    app: &TestApp,
    token: &str,
    file_name: &str,
    description: Option<&str>,
    tags: Option<&str>,
) -> Value {
    let png = png_bytes();
    let mut parts = vec![Part::file("file", file_name, "image/png", &png)];
    if let Some(description) = description {
        parts.push(Part::text("description", description));
    }
    if let Some(tags) = tags {
        parts.push(Part::text("tags", tags));
    }

    let (status, body) = send(&app.router, multipart_request("/media", token, &parts)).await;
    assert_eq!(status, 201, "upload failed: {}", body);
    body
}
