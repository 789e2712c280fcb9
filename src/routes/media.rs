//! Media upload, search, listing and CRUD handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::media::{
        MediaListQuery, MediaListResponse, MediaRecord, MediaSearchQuery, MediaType, MediaUpdate,
    },
    state::AppState,
    thumbnail, validation,
};

const TAGS_FORMAT_ERROR: &str = "Invalid tags format. Must be a JSON array.";

/// Upload a new image or video file
pub async fn upload_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<MediaRecord>)> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut file_data: Option<Bytes> = None;
    let mut description: Option<String> = None;
    let mut tags_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart body".to_string()))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?;
                file_data = Some(data);
            }
            Some("description") => {
                description = Some(field.text().await.map_err(|_| {
                    ApiError::BadRequest("Invalid description field".to_string())
                })?);
            }
            Some("tags") => {
                tags_raw = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::BadRequest("Invalid tags field".to_string()))?,
                );
            }
            _ => {}
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::BadRequest("Missing file".to_string()))?;
    let original_file_name =
        file_name.ok_or_else(|| ApiError::BadRequest("Missing file name".to_string()))?;
    let mime_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    // Both checks run before anything touches the blob store
    let media_kind =
        validation::validate_file_type(&original_file_name, &mime_type).map_err(ApiError::BadRequest)?;
    validation::validate_file_size(file_data.len(), state.max_upload_bytes)
        .map_err(ApiError::BadRequest)?;

    let tags = match tags_raw.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_tags(raw)?),
        None => None,
    };

    let blob = state
        .blobs
        .upload_file(user.id, &original_file_name, &mime_type, file_data.clone())
        .await
        .map_err(|e| {
            error!("Failed to upload blob: {}", e);
            ApiError::InternalServerError
        })?;

    // Images get a thumbnail; any failure is logged and the upload still succeeds
    let mut thumbnail_url = None;
    if media_kind == MediaType::Image {
        match thumbnail::generate(&file_data) {
            Ok(thumb) => {
                let thumb_name = format!("thumb_{}", original_file_name);
                match state
                    .blobs
                    .upload_file(user.id, &thumb_name, "image/jpeg", Bytes::from(thumb))
                    .await
                {
                    Ok(stored) => thumbnail_url = Some(stored.url),
                    Err(e) => warn!("Failed to upload thumbnail: {}", e),
                }
            }
            Err(e) => warn!("Failed to generate thumbnail: {}", e),
        }
    }

    let now = Utc::now();
    let record = MediaRecord {
        id: Uuid::new_v4(),
        user_id: user.id,
        file_name: blob.name,
        original_file_name,
        media_type: media_kind,
        file_size: file_data.len() as i64,
        mime_type,
        blob_url: blob.url,
        thumbnail_url,
        description,
        tags,
        uploaded_at: now,
        updated_at: now,
    };

    state.documents.create_media(&record).await.map_err(|e| {
        error!("Failed to persist media record: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Media uploaded: {} ({} bytes)", record.id, record.file_size);

    Ok((StatusCode::CREATED, Json(record)))
}

fn parse_tags(raw: &str) -> Result<serde_json::Value, ApiError> {
    let parsed: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| ApiError::BadRequest(TAGS_FORMAT_ERROR.to_string()))?;

    if !parsed.is_array() {
        return Err(ApiError::BadRequest(TAGS_FORMAT_ERROR.to_string()));
    }

    Ok(parsed)
}

/// Search media files by filename, description, or tags
pub async fn search_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<MediaSearchQuery>,
) -> ApiResult<Json<MediaListResponse>> {
    let query = params.query.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let (page, page_size) =
        validation::validate_pagination(params.page, params.page_size).map_err(ApiError::BadRequest)?;

    let (items, total) = state
        .documents
        .search_media(user.id, &query, page, page_size)
        .await
        .map_err(|e| {
            error!("Failed to search media: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(MediaListResponse {
        items,
        total,
        page,
        page_size,
    }))
}

/// Retrieve a paginated list of the caller's media files
pub async fn get_media_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<MediaListQuery>,
) -> ApiResult<Json<MediaListResponse>> {
    let (page, page_size) =
        validation::validate_pagination(params.page, params.page_size).map_err(ApiError::BadRequest)?;

    let media_type = match params.media_type.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse::<MediaType>().map_err(|_| {
            ApiError::BadRequest("mediaType must be 'image' or 'video'".to_string())
        })?),
    };

    let (items, total) = state
        .documents
        .get_user_media(user.id, page, page_size, media_type)
        .await
        .map_err(|e| {
            error!("Failed to list media: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(MediaListResponse {
        items,
        total,
        page,
        page_size,
    }))
}

/// Retrieve details of a specific media file
pub async fn get_media_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(media_id): Path<Uuid>,
) -> ApiResult<Json<MediaRecord>> {
    let record = fetch_owned_media(&state, media_id, user.id).await?;
    Ok(Json(record))
}

/// Update description and tags of a media file
pub async fn update_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(media_id): Path<Uuid>,
    Json(payload): Json<MediaUpdate>,
) -> ApiResult<Json<MediaRecord>> {
    fetch_owned_media(&state, media_id, user.id).await?;

    if let Some(tags) = &payload.tags {
        if !tags.is_array() {
            return Err(ApiError::BadRequest(TAGS_FORMAT_ERROR.to_string()));
        }
    }

    let updated = state
        .documents
        .update_media(media_id, user.id, &payload, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to update media {}: {}", media_id, e);
            ApiError::InternalServerError
        })?;

    // The record can vanish between the ownership check and the update
    updated
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Media not found".to_string()))
}

/// Delete a media file, its blobs, and its metadata
pub async fn delete_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(media_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let record = fetch_owned_media(&state, media_id, user.id).await?;

    state.blobs.delete_file(&record.file_name).await.map_err(|e| {
        error!("Failed to delete blob {}: {}", record.file_name, e);
        ApiError::InternalServerError
    })?;

    // Thumbnail cleanup is best effort
    if let Some(url) = &record.thumbnail_url {
        if let Some(name) = state.blobs.blob_name_for_url(url) {
            if let Err(e) = state.blobs.delete_file(&name).await {
                warn!("Thumbnail deletion failed: {}", e);
            }
        }
    }

    let deleted = state
        .documents
        .delete_media(media_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to delete media {}: {}", media_id, e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Media not found".to_string()));
    }

    info!("Media deleted: {}", media_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a media record and verify the caller owns it. A record owned by
/// someone else reports NotFound so callers cannot probe for existence.
async fn fetch_owned_media(
    state: &AppState,
    media_id: Uuid,
    user_id: Uuid,
) -> Result<MediaRecord, ApiError> {
    let record = state.documents.get_media(media_id).await.map_err(|e| {
        error!("Failed to fetch media {}: {}", media_id, e);
        ApiError::InternalServerError
    })?;

    match record {
        Some(record) if record.user_id == user_id => Ok(record),
        _ => Err(ApiError::NotFound("Media not found".to_string())),
    }
}
