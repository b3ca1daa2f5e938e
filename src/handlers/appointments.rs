use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Appointment, RepairItem};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::appointments;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub email: String,
    pub device: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<RepairItem>,
    pub profile_id: Option<Uuid>,
}

/// POST /api/appointments - book a repair appointment.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> ApiResult<Appointment> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::bad_request("a valid email is required"));
    }
    if payload.device.trim().is_empty() {
        return Err(ApiError::bad_request("device is required"));
    }
    if payload.scheduled_at < Utc::now() {
        return Err(ApiError::bad_request("scheduled_at must be in the future"));
    }

    let appointment = appointments::create(
        &state.db,
        payload.profile_id,
        payload.email.trim(),
        payload.device.trim(),
        payload.items,
        payload.scheduled_at,
    )
    .await?;

    Ok(ApiResponse::created(appointment))
}
