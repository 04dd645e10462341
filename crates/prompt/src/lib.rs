//! Prompt system for the digital twin.
//!
//! This crate provides structured prompt management with:
//! - Built-in YAML prompt definitions, overridable per workspace
//! - Handlebars template rendering for system and user messages

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_template};
pub use loader::{builtin_prompt, list_prompts, load_prompt, ASK_PROMPT_ID, SUMMARY_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptInputSpec};
