//! LLM provider factory.
//!
//! Builds the single client instance the application passes around
//! explicitly. Secrets are resolved by the caller (see `AppConfig`).

use crate::client::LlmClient;
use crate::providers::{GroqClient, MockClient, OllamaClient};
use crate::types::ProviderType;
use std::sync::Arc;
use twin_core::{AppError, AppResult};

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required by Groq
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// secret is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    tracing::debug!("Creating LLM client for provider '{}'", provider_type.as_str());

    match provider_type {
        ProviderType::Groq => {
            let api_key = api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| AppError::Config("Groq provider requires API key".to_string()))?;
            let client = match endpoint {
                Some(base_url) => GroqClient::with_base_url(base_url, api_key),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::fixed(
            "This is a canned answer from the mock provider.",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_groq_client() {
        let client = create_client("groq", None, Some("gsk-test")).unwrap();
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_groq_requires_api_key() {
        match create_client("groq", None, None) {
            Err(err) => assert!(err.to_string().contains("Groq provider requires API key")),
            Ok(_) => panic!("Expected error for Groq without API key"),
        }
        assert!(create_client("groq", None, Some("")).is_err());
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("ollama", Some("http://localhost:8080"), None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_mock_client() {
        let client = create_client("mock", None, None).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
