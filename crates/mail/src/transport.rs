//! Mail transport abstraction.

use crate::form::ContactForm;
use async_trait::async_trait;
use handlebars::Handlebars;
use serde::Serialize;
use twin_core::{AppError, AppResult};

const CONTACT_TEMPLATE: &str = include_str!("../templates/contact.html.hbs");

/// A rendered notification ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    /// Site owner's inbox
    pub to: String,
    /// Visitor's address
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingMail {
    /// Render the owner notification for `form`.
    pub fn from_form(form: &ContactForm, to: &str) -> AppResult<Self> {
        Ok(Self {
            to: to.to_string(),
            reply_to: form.email.clone(),
            subject: format!("New Contact: {}", form.subject),
            html: render_contact_html(form)?,
        })
    }
}

#[derive(Serialize)]
struct ContactView<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message_html: String,
}

/// Render the notification body. Fields are HTML-escaped and message line
/// breaks become `<br>`.
pub fn render_contact_html(form: &ContactForm) -> AppResult<String> {
    let handlebars = Handlebars::new();

    let view = ContactView {
        name: &form.name,
        email: &form.email,
        subject: &form.subject,
        message_html: handlebars::html_escape(&form.message).replace('\n', "<br>"),
    };

    handlebars
        .render_template(CONTACT_TEMPLATE, &view)
        .map_err(|e| AppError::Other(format!("Failed to render contact email: {}", e)))
}

/// A provider that can deliver an [`OutgoingMail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Deliver the mail. Any non-success response is an `Upstream` error.
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()>;
}
