use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

/// Shim over the AI completion API's chat endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    pub fn from_state(state: &AppState) -> Result<Self, ApiError> {
        let config = state
            .config
            .openai
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("AI features are not configured"))?;

        Ok(Self {
            http: state.http.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Sends the message list and returns the first completion's content.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "messages": messages }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AI completion API unreachable: {}", e);
                ApiError::bad_gateway("AI completion API unreachable")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("AI completion API rejected request ({}): {}", status, body);
            return Err(ApiError::bad_gateway("AI completion API rejected the request"));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("malformed AI completion response: {}", e);
            ApiError::bad_gateway("malformed AI completion response")
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ApiError::bad_gateway("AI completion response contained no choices"))
    }
}
