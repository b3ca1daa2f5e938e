use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::clients::openai::{ChatMessage, OpenAiClient};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

const SUPPORT_PROMPT: &str =
    "You are a support assistant for an electronics store and repair shop. \
     Answer briefly and suggest booking a repair appointment when relevant.";

/// POST /api/support/chat - proxy the conversation to the AI completion API.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<Value> {
    if payload.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }
    for message in &payload.messages {
        if !matches!(message.role.as_str(), "user" | "assistant") {
            return Err(ApiError::bad_request("message roles must be user or assistant"));
        }
        if message.content.trim().is_empty() {
            return Err(ApiError::bad_request("message content must not be empty"));
        }
    }

    let client = OpenAiClient::from_state(&state)?;

    let mut messages = vec![ChatMessage {
        role: "system".to_string(),
        content: SUPPORT_PROMPT.to_string(),
    }];
    messages.extend(payload.messages);

    let reply = client.chat(&messages).await?;
    Ok(ApiResponse::success(json!({ "reply": reply })))
}
