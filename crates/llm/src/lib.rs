//! LLM integration crate for the digital twin.
//!
//! This crate provides a provider-agnostic abstraction for the hosted
//! language model that composes the twin's answers.
//!
//! # Providers
//! - **Groq**: OpenAI-compatible chat completions (default)
//! - **Ollama**: Local LLM runtime
//! - **Mock**: Deterministic in-process client
//!
//! # Example
//! ```no_run
//! use twin_llm::{LlmClient, LlmRequest, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("gsk-...");
//! let request = LlmRequest::new("Hello, world!", "llama-3.1-8b-instant");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GroqClient, MockClient, OllamaClient};
pub use types::ProviderType;
