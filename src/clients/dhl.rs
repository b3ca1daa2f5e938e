use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

/// Shim over the shipping carrier's tracking endpoint. The response body is
/// passed through untouched; the carrier's shape is not ours to model.
pub struct DhlClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DhlClient {
    pub fn from_state(state: &AppState) -> Result<Self, ApiError> {
        let config = state
            .config
            .dhl
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("shipment tracking is not configured"))?;

        Ok(Self {
            http: state.http.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn track(&self, tracking_number: &str) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(format!("{}/track/shipments", self.base_url))
            .query(&[("trackingNumber", tracking_number)])
            .header("DHL-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("carrier API unreachable: {}", e);
                ApiError::bad_gateway("carrier API unreachable")
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::not_found("tracking number not found"));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("carrier API rejected request ({}): {}", status, body);
            return Err(ApiError::bad_gateway("carrier API rejected the request"));
        }

        response.json().await.map_err(|e| {
            tracing::error!("malformed carrier response: {}", e);
            ApiError::bad_gateway("malformed carrier response")
        })
    }
}
