//! Bearer-token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller resolved from the access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Extract and validate the JWT from the Authorization header, then make the
/// caller available to handlers through request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

    let claims = state.tokens.validate(token).map_err(|e| {
        warn!("Token validation failed: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}
