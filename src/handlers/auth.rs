use axum::extract::{Extension, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::services::identity;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Value> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let profile = identity::verify_credentials(&state.db, payload.email.trim(), &payload.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid email or password"))?;

    let token = auth::issue_token(&state.config.security, profile.id, &profile.email)
        .map_err(|e| {
            tracing::error!("token generation failed: {}", e);
            ApiError::internal_server_error("failed to create session")
        })?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_in": state.config.security.session_ttl_hours * 3600,
        "profile": {
            "id": profile.id,
            "email": profile.email,
            "role": profile.role,
        }
    })))
}

/// GET /api/auth/whoami - current profile, password hash excluded.
pub async fn whoami(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> ApiResult<Value> {
    let profile = identity::fetch_profile(&state.db, session.profile_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("profile no longer exists"))?;

    Ok(ApiResponse::success(json!({
        "id": profile.id,
        "email": profile.email,
        "role": profile.role,
        "created_at": profile.created_at,
    })))
}
