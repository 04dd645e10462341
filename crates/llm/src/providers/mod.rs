//! LLM provider implementations.

pub mod groq;
pub mod mock;
pub mod ollama;

pub use groq::GroqClient;
pub use mock::MockClient;
pub use ollama::OllamaClient;
