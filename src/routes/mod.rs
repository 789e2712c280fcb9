//! HTTP routes

pub mod auth;
pub mod media;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

/// Build the service router. Auth endpoints are open; every media endpoint
/// sits behind the bearer-token middleware.
pub fn create_router(state: AppState) -> Router {
    // The application-level size check owns the "file too large" error, so the
    // framework limit sits above the configured cap.
    let body_limit = state.max_upload_bytes + 64 * 1024;

    let protected_routes = Router::new()
        .route(
            "/media",
            post(media::upload_media).get(media::get_media_list),
        )
        .route("/media/search", get(media::search_media))
        .route(
            "/media/:id",
            get(media::get_media_by_id)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "media-vault"
    }))
}
