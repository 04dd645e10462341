//! Resend transport.
//!
//! https://resend.com/docs/api-reference/emails/send-email

use crate::transport::{MailTransport, OutgoingMail};
use serde::Serialize;
use twin_core::{AppError, AppResult};

/// Default Resend API base URL.
pub const RESEND_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    html: &'a str,
}

pub struct ResendTransport {
    base_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self::with_base_url(RESEND_BASE_URL, api_key, from)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for ResendTransport {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        let body = ResendEmail {
            from: &self.from,
            to: &mail.to,
            reply_to: &mail.reply_to,
            subject: &mail.subject,
            html: &mail.html,
        };
        let url = format!("{}/emails", self.base_url);

        tracing::debug!("Sending contact mail via Resend to {}", mail.to);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send request to Resend: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream(format!(
                "Resend API error ({}): {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
