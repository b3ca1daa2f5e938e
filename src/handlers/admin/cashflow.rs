use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::finance;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CashflowQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// "day" or "category"; omitted means scalar totals.
    pub group_by: Option<String>,
}

/// GET /api/admin/cashflow - completed-transaction totals, optionally grouped.
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<CashflowQuery>,
) -> ApiResult<Value> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from >= to {
            return Err(ApiError::bad_request("from must be before to"));
        }
    }

    let rows = finance::completed_between(&state.db, query.from, query.to).await?;

    let data = match query.group_by.as_deref() {
        None => {
            let report = finance::totals(&rows);
            json!({
                "income": report.income,
                "expense": report.expense,
                "profit": report.profit,
            })
        }
        Some("day") => json!({ "by_day": finance::net_by_key(&rows, finance::day_key) }),
        Some("category") => {
            json!({ "by_category": finance::net_by_key(&rows, finance::category_key) })
        }
        Some(other) => {
            return Err(ApiError::bad_request(format!("unsupported group_by: {other}")));
        }
    };

    Ok(ApiResponse::success(data))
}
