use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::clients::stripe::StripeClient;
use crate::database::models::Transaction;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

fn default_currency() -> String {
    "usd".to_string()
}

/// POST /api/checkout - price the cart server-side, open a payment intent,
/// record a pending income transaction keyed by the intent id.
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> ApiResult<Value> {
    if payload.items.is_empty() {
        return Err(ApiError::bad_request("cart is empty"));
    }

    let stripe = StripeClient::from_state(&state)?;

    let ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
    let products = catalog::find_many(&state.db, &ids).await?;
    let requested: Vec<(Uuid, i32)> = payload.items.iter().map(|i| (i.product_id, i.quantity)).collect();
    let total = catalog::order_total(&products, &requested)?;

    let intent = stripe
        .create_intent(total, &payload.currency, "storefront order")
        .await?;

    sqlx::query(
        "INSERT INTO transactions (id, amount, kind, status, category, payment_intent_id) \
         VALUES ($1, $2, 'income', 'pending', 'store', $3)",
    )
    .bind(Uuid::new_v4())
    .bind(total)
    .bind(&intent.id)
    .execute(&state.db)
    .await?;

    Ok(ApiResponse::created(json!({
        "payment_intent_id": intent.id,
        "client_secret": intent.client_secret,
        "amount": total,
        "currency": payload.currency,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub payment_intent_id: String,
}

/// POST /api/payments/confirm - confirm the intent with the processor and
/// complete the matching transaction once the charge succeeded.
pub async fn confirm(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmRequest>,
) -> ApiResult<Value> {
    if payload.payment_intent_id.trim().is_empty() {
        return Err(ApiError::bad_request("payment_intent_id is required"));
    }

    let stripe = StripeClient::from_state(&state)?;

    let transaction = sqlx::query_as::<_, Transaction>(
        "SELECT id, amount, kind, status, category, payment_intent_id, profile_id, created_at \
         FROM transactions WHERE payment_intent_id = $1",
    )
    .bind(&payload.payment_intent_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("no transaction for that payment intent"))?;

    let intent = stripe.confirm_intent(&payload.payment_intent_id).await?;

    if intent.status == "succeeded" {
        sqlx::query("UPDATE transactions SET status = 'completed' WHERE id = $1")
            .bind(transaction.id)
            .execute(&state.db)
            .await?;
    }

    Ok(ApiResponse::success(json!({
        "payment_intent_id": intent.id,
        "status": intent.status,
    })))
}
