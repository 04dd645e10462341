//! Command handlers for the digital twin CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod contact;
pub mod mcp;
pub mod profile;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use contact::ContactCommand;
pub use mcp::McpCommand;
pub use profile::ProfileCommand;
pub use serve::ServeCommand;

use std::sync::Arc;
use twin_core::{config::AppConfig, AppResult};
use twin_knowledge::DigitalTwin;
use twin_llm::create_client;

/// Validate the LLM settings and build the twin around one shared client.
pub(crate) fn build_twin(config: &AppConfig) -> AppResult<Arc<DigitalTwin>> {
    config.validate()?;

    let client = create_client(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;

    tracing::debug!(
        "Using provider {} with model {}",
        client.provider_name(),
        config.model
    );

    Ok(Arc::new(DigitalTwin::from_config(config, client)))
}
