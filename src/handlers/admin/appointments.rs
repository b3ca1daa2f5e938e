use axum::extract::{Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::clients::mailer::HttpMailer;
use crate::database::models::Appointment;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::appointments;
use crate::AppState;

/// GET /api/admin/appointments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Appointment>> {
    let rows = appointments::list(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/admin/appointments/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Appointment> {
    let appointment = appointments::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("appointment not found"))?;

    Ok(ApiResponse::success(appointment))
}

/// POST /api/admin/appointments/:id/notify - email the customer the current
/// appointment status.
pub async fn notify(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    let appointment = appointments::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("appointment not found"))?;

    let mailer = HttpMailer::from_state(&state)?;
    appointments::notify(&mailer, &appointment).await?;

    Ok(ApiResponse::success(json!({ "sent": true, "status": appointment.status })))
}
