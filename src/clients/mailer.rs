use async_trait::async_trait;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

/// Seam for the transactional email sender; handlers depend on the trait so
/// notification logic is testable without the wire.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError>;
}

/// HTTP mail relay client.
pub struct HttpMailer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn from_state(state: &AppState) -> Result<Self, ApiError> {
        let config = state
            .config
            .mailer
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("email sending is not configured"))?;

        Ok(Self {
            http: state.http.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "from": self.from, "to": to, "subject": subject, "html": html }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("mailer unreachable: {}", e);
                ApiError::bad_gateway("mailer unreachable")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("mailer rejected request ({}): {}", status, body);
            return Err(ApiError::bad_gateway("mailer rejected the request"));
        }

        Ok(())
    }
}

/// Masks an email address for logging. Usernames of two characters or fewer
/// stay unchanged; masking them would leave nothing recognizable anyway.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((user, domain)) if user.chars().count() > 2 => {
            let prefix: String = user.chars().take(2).collect();
            format!("{prefix}***@{domain}")
        }
        _ => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_usernames() {
        assert_eq!(mask_email("john.doe@example.com"), "jo***@example.com");
        assert_eq!(mask_email("maria@shop.example"), "ma***@shop.example");
    }

    #[test]
    fn leaves_short_usernames_unchanged() {
        assert_eq!(mask_email("a@b.com"), "a@b.com");
        assert_eq!(mask_email("ab@b.com"), "ab@b.com");
    }

    #[test]
    fn leaves_non_addresses_unchanged() {
        assert_eq!(mask_email("not-an-email"), "not-an-email");
        assert_eq!(mask_email(""), "");
    }
}
