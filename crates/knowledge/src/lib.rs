//! Profile knowledge for the digital twin.
//!
//! Loads the profile document, ranks its chunks lexically against a
//! question and composes the model-generated answer.

pub mod profile;
pub mod ranker;
pub mod reply;
pub mod twin;

// Re-export commonly used types
pub use profile::{load_profile, Contact, ContentChunk, Personal, ProfileDocument};
pub use ranker::{normalize_scores, rank, tokenize, ScoredChunk, DEFAULT_TOP_K};
pub use reply::{ChatReply, SourceRef, TwinAnswer};
pub use twin::{format_with_sources, DigitalTwin, DEFAULT_MAX_TOKENS, INVALID_QUESTION_MESSAGE};
