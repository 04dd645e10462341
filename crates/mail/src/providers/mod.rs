//! Mail provider implementations.

pub mod resend;
pub mod sendgrid;

pub use resend::ResendTransport;
pub use sendgrid::SendGridTransport;
