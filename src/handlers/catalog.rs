use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::Product;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog;
use crate::AppState;

/// GET /api/products - active catalog.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = catalog::list_active(&state.db).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Product> {
    let product = catalog::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))?;

    Ok(ApiResponse::success(product))
}
