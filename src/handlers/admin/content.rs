use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::clients::openai::{ChatMessage, OpenAiClient};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DescribeRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// POST /api/admin/content/describe - generate a product description.
pub async fn describe(
    State(state): State<AppState>,
    Json(payload): Json<DescribeRequest>,
) -> ApiResult<Value> {
    if payload.name.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(ApiError::bad_request("name and category are required"));
    }

    let client = OpenAiClient::from_state(&state)?;

    let mut prompt = format!(
        "Write a two-sentence store listing description for \"{}\" in the {} category.",
        payload.name.trim(),
        payload.category.trim()
    );
    if !payload.keywords.is_empty() {
        prompt.push_str(&format!(" Mention: {}.", payload.keywords.join(", ")));
    }

    let messages = [ChatMessage {
        role: "user".to_string(),
        content: prompt,
    }];

    let description = client.chat(&messages).await?;
    Ok(ApiResponse::success(json!({ "description": description })))
}
