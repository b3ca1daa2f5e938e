use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::finance;
use crate::AppState;

/// GET /api/admin/revenue - completed income total.
pub async fn get(State(state): State<AppState>) -> ApiResult<Value> {
    let rows = finance::completed_income(&state.db).await?;
    let report = finance::totals(&rows);

    Ok(ApiResponse::success(json!({ "total": report.income })))
}
