//! Profile document loading.
//!
//! The profile is a JSON file (`digitaltwin.json` by default) read fresh on
//! every call so edits take effect without a restart.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use twin_core::{AppError, AppResult};
use twin_prompt::{build_prompt, builtin_prompt, PromptDefinition, SUMMARY_PROMPT_ID};

/// Parsed profile document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub personal: Personal,

    /// Retrievable snippets, in document order
    #[serde(default, deserialize_with = "lenient_chunks")]
    pub content_chunks: Vec<ContentChunk>,
}

/// Identity fields shown in the profile summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Personal {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

/// One retrievable snippet of the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChunk {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// `content_chunks` that is not an array contributes no chunks.
fn lenient_chunks<'de, D>(deserializer: D) -> Result<Vec<ContentChunk>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

impl ProfileDocument {
    /// Parse a profile from JSON text.
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::DataUnavailable(format!("Invalid profile document: {}", e)))
    }

    /// Name of the person the twin represents, if the profile has one.
    pub fn name(&self) -> Option<&str> {
        self.personal.name.as_deref()
    }

    /// Render the profile summary with the built-in template.
    pub fn summary(&self) -> AppResult<String> {
        let definition = builtin_prompt(SUMMARY_PROMPT_ID).ok_or_else(|| {
            AppError::Prompt(format!("Missing built-in prompt: {}", SUMMARY_PROMPT_ID))
        })?;
        self.summary_with(&definition)
    }

    /// Render the profile summary with `definition`. Missing fields render
    /// as empty strings.
    pub fn summary_with(&self, definition: &PromptDefinition) -> AppResult<String> {
        let personal = &self.personal;
        let fields = [
            ("name", &personal.name),
            ("title", &personal.title),
            ("location", &personal.location),
            ("email", &personal.contact.email),
            ("linkedin", &personal.contact.linkedin),
            ("github", &personal.contact.github),
        ];

        let variables: HashMap<String, String> = fields
            .iter()
            .map(|(key, value)| {
                let value = value.as_deref().unwrap_or_default();
                (key.to_string(), value.to_string())
            })
            .collect();

        Ok(build_prompt(definition, variables)?.user)
    }
}

/// Read and parse the profile document at `path`.
pub fn load_profile(path: &Path) -> AppResult<ProfileDocument> {
    tracing::debug!("Loading profile from: {:?}", path);

    if !path.exists() {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        tracing::error!("Profile document not found at {:?} (cwd: {})", path, cwd);
        return Err(AppError::DataUnavailable(format!(
            "Profile document not found: {}",
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read profile {:?}: {}", path, e);
        AppError::DataUnavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let profile = ProfileDocument::from_json(&raw).inspect_err(|e| {
        tracing::error!("Failed to parse profile {:?}: {}", path, e);
    })?;

    tracing::debug!(
        "Loaded profile with {} content chunks",
        profile.content_chunks.len()
    );

    Ok(profile)
}
