use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Delivers a single HTML email.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Sends through the Brevo transactional email API.
#[derive(Clone)]
pub struct BrevoEmailSender {
    client: reqwest::Client,
    api_key: String,
    from_name: String,
    from_address: String,
}

impl BrevoEmailSender {
    pub fn new(api_key: String, from_name: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_name,
            from_address,
        }
    }
}

#[async_trait::async_trait]
impl EmailSender for BrevoEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "sender": { "name": self.from_name, "email": self.from_address },
            "to": [{ "email": to }],
            "subject": subject,
            "htmlContent": html_body,
        });

        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("accept", "application/json")
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Email(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Email(format!("status={} body={}", status, body)));
        }

        tracing::info!("📧 Email sent: subject={:?}", subject);
        Ok(())
    }
}

/// A message captured by [`Outbox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Keeps every message in memory instead of delivering it.
///
/// Used when no email API key is configured and by tests to inspect what
/// would have been sent.
#[derive(Clone, Default)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailSender for Outbox {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        tracing::info!("📭 Email kept in outbox: subject={:?}", subject);
        self.sent.lock().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}
