//! Contact relay: validate, deliver through the first working transport,
//! or fall back to the server log.

use crate::form::ContactForm;
use crate::providers::{ResendTransport, SendGridTransport};
use crate::transport::{MailTransport, OutgoingMail};
use serde::{Serialize, Serializer};
use twin_core::config::MailConfig;
use twin_core::{AppResult, ErrorKind};

pub const SENT_MESSAGE: &str = "Message sent successfully! I will get back to you soon.";
pub const LOGGED_MESSAGE: &str =
    "Message received! Thank you for reaching out. I will get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Result of relaying a contact form.
///
/// Serializes as `{ success: true, message }` or `{ success: false, error }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Sent { message: String },
    Failed { kind: ErrorKind, error: String },
}

impl ContactOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ContactOutcome::Sent { .. })
    }

    fn sent(message: &str) -> Self {
        ContactOutcome::Sent {
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ContactOutcomeWire<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for ContactOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            ContactOutcome::Sent { message } => ContactOutcomeWire {
                success: true,
                message: Some(message),
                error: None,
            },
            ContactOutcome::Failed { error, .. } => ContactOutcomeWire {
                success: false,
                message: None,
                error: Some(error),
            },
        };
        wire.serialize(serializer)
    }
}

/// Delivers contact forms to the site owner.
pub struct ContactRelay {
    recipient: String,
    transports: Vec<Box<dyn MailTransport>>,
}

impl ContactRelay {
    /// Relay delivering to `recipient` through `transports`, tried in order.
    pub fn new(recipient: impl Into<String>, transports: Vec<Box<dyn MailTransport>>) -> Self {
        Self {
            recipient: recipient.into(),
            transports,
        }
    }

    /// Relay without transports; every message goes to the log.
    pub fn log_only() -> Self {
        Self::new(String::new(), Vec::new())
    }

    /// Resend first, then SendGrid, each only when its key is set.
    ///
    /// Fails when a provider key is set without a recipient.
    pub fn from_config(config: &MailConfig) -> AppResult<Self> {
        config.validate()?;

        let mut transports: Vec<Box<dyn MailTransport>> = Vec::new();

        if let Some(key) = &config.resend_api_key {
            transports.push(Box::new(ResendTransport::new(
                key.clone(),
                config.resend_from.clone(),
            )));
        }

        if let Some(key) = &config.sendgrid_api_key {
            transports.push(Box::new(SendGridTransport::new(
                key.clone(),
                config.sendgrid_from.clone(),
            )));
        }

        tracing::debug!(
            "Contact relay transports: {:?}",
            transports.iter().map(|t| t.name()).collect::<Vec<_>>()
        );

        Ok(Self::new(
            config.contact_email.clone().unwrap_or_default(),
            transports,
        ))
    }

    pub fn transport_names(&self) -> Vec<&str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Validate and deliver `form`. Never fails; problems are reported in
    /// the outcome.
    pub async fn send(&self, form: &ContactForm) -> ContactOutcome {
        if let Err(e) = form.validate() {
            tracing::warn!("Rejected contact form: {}", e);
            return ContactOutcome::Failed {
                kind: e.kind(),
                error: match e {
                    twin_core::AppError::InvalidInput(msg) => msg,
                    other => other.to_string(),
                },
            };
        }

        if !self.transports.is_empty() {
            let mail = match OutgoingMail::from_form(form, &self.recipient) {
                Ok(mail) => mail,
                Err(e) => {
                    tracing::error!("Error sending contact message: {}", e);
                    return ContactOutcome::Failed {
                        kind: e.kind(),
                        error: FAILURE_MESSAGE.to_string(),
                    };
                }
            };

            for transport in &self.transports {
                match transport.send(&mail).await {
                    Ok(()) => {
                        tracing::info!("Contact message delivered via {}", transport.name());
                        return ContactOutcome::sent(SENT_MESSAGE);
                    }
                    Err(e) => {
                        tracing::error!("{} error: {}", transport.name(), e);
                    }
                }
            }
        }

        tracing::info!(
            timestamp = %chrono::Utc::now().to_rfc3339(),
            name = %form.name,
            email = %form.email,
            subject = %form.subject,
            message = %form.message,
            "Contact message received"
        );

        ContactOutcome::sent(LOGGED_MESSAGE)
    }
}
