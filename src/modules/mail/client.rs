use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::MailConfig;
use crate::core::error::{AppError, Result};

/// One outgoing email: recipient, subject, plain-text body and an optional
/// HTML alternative.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: Option<String>,
}

/// Mail delivery boundary.
///
/// Delivery transport is an external collaborator; callers treat a failed
/// send as non-fatal and only log it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: String,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

/// Client for an HTTP mail gateway (Mailgun-style JSON API)
pub struct HttpMailClient {
    config: MailConfig,
    http_client: reqwest::Client,
}

impl HttpMailClient {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailClient {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let url = format!("{}/messages", self.config.endpoint);

        let request_body = SendMailRequest {
            from: format!("{} <{}>", self.config.from_name, self.config.from_address),
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
            html: message.html.as_deref(),
        };

        tracing::debug!("Sending mail to {}: {}", message.to, message.subject);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Mail gateway unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Mail gateway returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
