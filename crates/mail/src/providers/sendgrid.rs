//! SendGrid v3 transport.

use crate::transport::{MailTransport, OutgoingMail};
use serde::Serialize;
use twin_core::{AppError, AppResult};

/// Default SendGrid API base URL.
pub const SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

pub struct SendGridTransport {
    base_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl SendGridTransport {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self::with_base_url(SENDGRID_BASE_URL, api_key, from)
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

    fn to_request<'a>(&'a self, mail: &'a OutgoingMail) -> SendRequest<'a> {
        SendRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: &mail.to }],
            }],
            from: Address { email: &self.from },
            reply_to: Address {
                email: &mail.reply_to,
            },
            subject: &mail.subject,
            content: vec![Content {
                kind: "text/html",
                value: &mail.html,
            }],
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for SendGridTransport {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        let url = format!("{}/v3/mail/send", self.base_url);

        tracing::debug!("Sending contact mail via SendGrid to {}", mail.to);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.to_request(mail))
            .send()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("Failed to send request to SendGrid: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream(format!(
                "SendGrid API error ({}): {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
