use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Session token claims. The role is deliberately absent: authorization always
/// reads the stored role from the profiles table, so a stale token can never
/// grant access a revoked profile no longer has.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(profile_id: Uuid, email: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: profile_id,
            email,
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("session token generation failed: {0}")]
    Generation(String),

    #[error("invalid session token: {0}")]
    Invalid(String),
}

pub fn issue_token(security: &SecurityConfig, profile_id: Uuid, email: &str) -> Result<String, TokenError> {
    let claims = Claims::new(profile_id, email.to_string(), security.session_ttl_hours);
    let key = EncodingKey::from_secret(security.session_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
}

pub fn verify_token(security: &SecurityConfig, token: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(security.session_secret.as_bytes());
    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Hex-encoded SHA-256 digest used for credential comparison.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
