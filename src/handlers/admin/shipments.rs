use axum::extract::{Path, State};
use serde_json::Value;

use crate::clients::dhl::DhlClient;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/admin/shipments/:tracking - carrier tracking pass-through.
pub async fn get(State(state): State<AppState>, Path(tracking): Path<String>) -> ApiResult<Value> {
    let tracking = tracking.trim();
    if tracking.is_empty() || !tracking.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::bad_request("invalid tracking number"));
    }

    let client = DhlClient::from_state(&state)?;
    let shipment = client.track(tracking).await?;

    Ok(ApiResponse::success(shipment))
}
