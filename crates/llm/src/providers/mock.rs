//! Mock LLM provider for tests and offline demos.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::Mutex;
use twin_core::{AppError, AppResult};

/// What the mock answers with.
#[derive(Debug, Clone)]
enum MockBehavior {
    /// Echo the user prompt back.
    Echo,
    /// Always return this text.
    Fixed(String),
    /// Always fail with an upstream error carrying this message.
    Fail(String),
}

/// Deterministic in-process LLM.
///
/// Records every request it receives so tests can assert on the
/// prompt that reached the model.
#[derive(Debug)]
pub struct MockClient {
    behavior: MockBehavior,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    /// Mock that echoes the user prompt.
    pub fn echo() -> Self {
        Self::with_behavior(MockBehavior::Echo)
    }

    /// Mock that always answers `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fixed(text.into()))
    }

    /// Mock whose every call fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.into()))
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let content = match &self.behavior {
            MockBehavior::Echo => request.prompt.clone(),
            MockBehavior::Fixed(text) => text.clone(),
            MockBehavior::Fail(message) => return Err(AppError::Upstream(message.clone())),
        };

        let prompt_tokens = request.prompt.split_whitespace().count() as u32;
        let completion_tokens = content.split_whitespace().count() as u32;

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(prompt_tokens, completion_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_records_requests() {
        let client = MockClient::fixed("hello");
        let response = client
            .complete(&LlmRequest::new("who are you", "m"))
            .await
            .unwrap();

        assert_eq!(response.content, "hello");
        assert_eq!(response.usage.prompt_tokens, 3);
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.requests()[0].prompt, "who are you");
    }

    #[tokio::test]
    async fn test_echo() {
        let client = MockClient::echo();
        let response = client.complete(&LlmRequest::new("ping", "m")).await.unwrap();
        assert_eq!(response.content, "ping");
    }

    #[tokio::test]
    async fn test_failing() {
        let client = MockClient::failing("rate limited");
        let err = client
            .complete(&LlmRequest::new("x", "m"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(client.call_count(), 1);
    }
}
