//! Authentication Handlers
//!
//! Handles registration, login and current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn validate_register(payload: &RegisterRequest) -> AppResult<()> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    if payload.password.len() < 6 {
        return Err(AppError::validation(
            "password must be at least 6 characters",
        ));
    }
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// POST /api/auth/register - 注册新用户
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_register(&payload)?;

    let password_hash = hash_password(&payload.password)?;
    let created = user::create(
        &state.pool,
        &payload.email,
        &password_hash,
        &payload.name,
        payload.phone.as_deref(),
        UserRole::Client,
    )
    .await?;

    let access_token = state
        .jwt_service
        .generate_token(&created)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        user: UserResponse::from(created),
    }))
}

/// POST /api/auth/login - 登录
///
/// 统一的凭证错误消息，避免邮箱枚举
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let found = user::find_by_email(&state.pool, &payload.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let found = match found {
        Some(u) => u,
        None => {
            tracing::warn!(email = %payload.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !verify_password(&found.password_hash, &payload.password)? {
        tracing::warn!(email = %payload.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let access_token = state
        .jwt_service
        .generate_token(&found)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        user: UserResponse::from(found),
    }))
}

/// GET /api/auth/me - 当前登录用户
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let found = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current_user.id)))?;
    Ok(Json(UserResponse::from(found)))
}
