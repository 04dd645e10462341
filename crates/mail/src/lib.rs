//! Contact form relay for the digital twin site.
//!
//! Validates visitor messages and forwards them to the site owner through
//! Resend or SendGrid, falling back to the server log when neither is
//! configured or both fail.

pub mod form;
pub mod providers;
pub mod relay;
pub mod transport;

pub use form::{is_valid_email, ContactForm, INVALID_EMAIL_MESSAGE, REQUIRED_FIELDS_MESSAGE};
pub use providers::{ResendTransport, SendGridTransport};
pub use relay::{ContactOutcome, ContactRelay};
pub use transport::{render_contact_html, MailTransport, OutgoingMail};
