use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated principal extracted from a bearer session token. Carries no
/// role: guards fetch that from the profiles table per request.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub profile_id: Uuid,
    pub email: String,
}

/// Validates the session token and injects `SessionUser` into the request.
/// Routes behind this layer never run without a verified session.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("session required"))?;

    let claims = auth::verify_token(&state.config.security, &token).map_err(|e| {
        tracing::debug!("session token rejected: {}", e);
        ApiError::unauthorized("invalid or expired session")
    })?;

    request.extensions_mut().insert(SessionUser {
        profile_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("authorization")?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_empty_or_non_bearer() {
        assert!(bearer_token(&HeaderMap::new()).is_none());
        assert!(bearer_token(&headers_with("Bearer ")).is_none());
        assert!(bearer_token(&headers_with("Basic dXNlcg==")).is_none());
    }
}
