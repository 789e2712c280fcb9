//! Registration and login handlers

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::user::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse},
    password,
    state::AppState,
    validation,
};

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Registration attempt for email: {}", payload.email);

    validation::validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let existing = state
        .documents
        .get_user_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        warn!("Registration failed: email already exists: {}", payload.email);
        return Err(ApiError::BadRequest(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let user = User {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        password_hash,
        created_at: Utc::now(),
    };

    state.documents.create_user(&user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    let token = state.tokens.issue(user.id, &user.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    info!("User created successfully: {}", user.email);

    Ok(Json(TokenResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Authenticate a user and issue an access token.
///
/// Unknown email and wrong password produce identical responses so the two
/// cases cannot be told apart.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Login attempt for email: {}", payload.email);

    let user = state
        .documents
        .get_user_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(user) = user else {
        warn!("Login failed: user not found for email {}", payload.email);
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    if !password::verify_password(&payload.password, &user.password_hash) {
        warn!("Login failed: invalid password for email {}", payload.email);
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.tokens.issue(user.id, &user.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Login successful for user: {}", user.email);

    Ok(Json(TokenResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
