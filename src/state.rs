//! Application state shared across handlers

use std::sync::Arc;

use crate::jwt::TokenService;
use crate::store::{BlobStore, DocumentStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub tokens: TokenService,
    pub max_upload_bytes: usize,
}
