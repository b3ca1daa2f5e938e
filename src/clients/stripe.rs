use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

/// Thin shim over the payment processor's payment-intent endpoints. No
/// retries: a failed call surfaces straight back to the route.
pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

impl StripeClient {
    /// Answers 503 when no secret key was configured; the rest of the service
    /// keeps running without payments.
    pub fn from_state(state: &AppState) -> Result<Self, ApiError> {
        let config = state
            .config
            .stripe
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("payment processing is not configured"))?;

        Ok(Self {
            http: state.http.clone(),
            base_url: config.base_url.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    pub async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
    ) -> Result<PaymentIntent, ApiError> {
        let minor = to_minor_units(amount)
            .ok_or_else(|| ApiError::bad_request("amount out of range"))?;

        let params = [
            ("amount", minor.to_string()),
            ("currency", currency.to_string()),
            ("description", description.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("payment processor unreachable: {}", e);
                ApiError::bad_gateway("payment processor unreachable")
            })?;

        Self::parse(response).await
    }

    pub async fn confirm_intent(&self, intent_id: &str) -> Result<PaymentIntent, ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/payment_intents/{}/confirm", self.base_url, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("payment processor unreachable: {}", e);
                ApiError::bad_gateway("payment processor unreachable")
            })?;

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<PaymentIntent, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("payment processor rejected request ({}): {}", status, body);
            return Err(ApiError::bad_gateway("payment processor rejected the request"));
        }

        response.json::<PaymentIntent>().await.map_err(|e| {
            tracing::error!("malformed payment processor response: {}", e);
            ApiError::bad_gateway("malformed payment processor response")
        })
    }
}

/// Converts a decimal amount to minor units (cents), rounding halves away
/// from zero. The processor only accepts integer minor units.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
