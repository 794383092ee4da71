//! User registration and login handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use reelshare_common::{
    auth::{hash_password, verify_password},
    db::Repository,
    errors::{AppError, Result},
    metrics,
};

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 64))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 64))]
    #[serde(default)]
    pub last_name: String,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<StatusCode> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let password_hash = hash_password(&request.password)?;

    let repo = Repository::new(state.db.clone());
    let user = repo
        .create_user(
            request.username,
            password_hash,
            request.first_name,
            request.last_name,
        )
        .await?;

    metrics::record_registration();

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(StatusCode::CREATED)
}

/// Log a user in and issue a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let repo = Repository::new(state.db.clone());

    // An unknown username and a wrong password are indistinguishable to the
    // caller
    let user = match repo.find_user_by_username(&request.username).await? {
        Some(user) => user,
        None => {
            metrics::record_login(false);
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&request.password, &user.password_hash)? {
        metrics::record_login(false);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.generate_token(user.id)?;

    metrics::record_login(true);

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        username: user.username,
        token,
    }))
}
