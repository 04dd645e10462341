//! Prompt loader for built-in and workspace YAML prompt definitions.
//!
//! Built-in prompts are compiled into the binary. A file named `<id>.yml`
//! in the workspace's `.twin/prompts/` directory replaces the built-in
//! prompt with the same id.

use crate::types::PromptDefinition;
use std::path::{Path, PathBuf};
use twin_core::{AppError, AppResult};

/// Prompt used to compose digital twin answers.
pub const ASK_PROMPT_ID: &str = "twin.ask.default";

/// Prompt used to render the profile summary.
pub const SUMMARY_PROMPT_ID: &str = "twin.profile.summary";

const BUILTIN_PROMPTS: [(&str, &str); 2] = [
    (
        ASK_PROMPT_ID,
        include_str!("../prompts/twin.ask.default.yml"),
    ),
    (
        SUMMARY_PROMPT_ID,
        include_str!("../prompts/twin.profile.summary.yml"),
    ),
];

/// Load a prompt definition by ID.
///
/// The workspace override `.twin/prompts/<id>.yml` wins over the built-in
/// definition.
///
/// # Example
/// ```no_run
/// use twin_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "twin.ask.default")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;
        tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
        return Ok(definition);
    }

    builtin_prompt(prompt_id).ok_or_else(|| {
        AppError::Prompt(format!(
            "Prompt not found: {} (no built-in and no {:?})",
            prompt_id, prompt_file
        ))
    })
}

/// Get a built-in prompt definition.
pub fn builtin_prompt(prompt_id: &str) -> Option<PromptDefinition> {
    BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .and_then(|(id, yaml)| match parse_prompt(yaml, id) {
            Ok(def) => Some(def),
            Err(e) => {
                tracing::error!("Built-in prompt {} is invalid: {}", id, e);
                None
            }
        })
}

/// List all available prompt IDs: built-ins plus workspace overrides.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| id.to_string())
        .collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".twin").join("prompts")
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
