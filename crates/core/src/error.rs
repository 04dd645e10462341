//! Error types for the digital twin service.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! profile data, upstream providers, request validation, and prompt errors,
//! plus the coarse `ErrorKind` that is exposed to callers in failure results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the digital twin service.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic: errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile document missing or unparseable
    #[error("Profile data unavailable: {0}")]
    DataUnavailable(String),

    /// Language-model or mail provider call failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Missing or malformed request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Classify this error for structured failure results.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::DataUnavailable(_) => ErrorKind::DataUnavailable,
            AppError::Upstream(_) => ErrorKind::UpstreamFailure,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Prompt(_)
            | AppError::Serialization(_)
            | AppError::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Caller-facing error category carried by failure results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DataUnavailable,
    UpstreamFailure,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataUnavailable => "data_unavailable",
            Self::UpstreamFailure => "upstream_failure",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
