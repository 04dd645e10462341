//! Contact form input and validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use twin_core::{AppError, AppResult};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex pattern is hardcoded and must be valid")
});

pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

/// A visitor's contact message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Check that every field is present and the email looks like one.
    pub fn validate(&self) -> AppResult<()> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(AppError::InvalidInput(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        if !is_valid_email(&self.email) {
            return Err(AppError::InvalidInput(INVALID_EMAIL_MESSAGE.to_string()));
        }

        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@` before the dot.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm::new("Ada", "ada@example.com", "Hello", "Hi there")
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_missing_field() {
        let mut f = form();
        f.subject.clear();

        let err = f.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "All fields are required"));
    }

    #[test]
    fn test_invalid_email() {
        let mut f = form();
        f.email = "not-an-email".to_string();

        let err = f.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Invalid email address"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let f: ContactForm = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert!(f.email.is_empty());
        assert!(f.validate().is_err());
    }
}
