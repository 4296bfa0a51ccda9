//! Mail sender client

use async_trait::async_trait;
use serde::Serialize;
use shared::error::AppError;

#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Outbound notification mail
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError>;
}

/// HTTP-backed mail relay
#[derive(Clone)]
pub struct HttpMailSender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMailSender {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&MailPayload { to, subject, html })
            .send()
            .await
            .map_err(|e| AppError::mail(format!("Mail send failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::mail(format!(
                "Mail relay rejected: {}",
                response.status()
            )));
        }
        Ok(())
    }
}
