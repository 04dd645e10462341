//! Profile command handler.

use clap::Args;
use twin_core::{config::AppConfig, AppResult};
use twin_knowledge::load_profile;
use twin_prompt::{list_prompts, load_prompt, SUMMARY_PROMPT_ID};

/// Show the profile summary
#[derive(Args, Debug)]
pub struct ProfileCommand {
    /// List content chunk titles after the summary
    #[arg(long)]
    pub chunks: bool,

    /// Print the parsed profile document as JSON
    #[arg(long)]
    pub json: bool,

    /// List available prompt ids (built-in and workspace overrides)
    #[arg(long)]
    pub prompts: bool,
}

impl ProfileCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing profile command");

        if self.prompts {
            for id in list_prompts(&config.workspace)? {
                println!("{}", id);
            }
            return Ok(());
        }

        let profile = load_profile(&config.profile_path())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            return Ok(());
        }

        let definition = load_prompt(&config.workspace, SUMMARY_PROMPT_ID)?;
        println!("{}", profile.summary_with(&definition)?);

        if self.chunks {
            println!();
            println!("Content chunks ({}):", profile.content_chunks.len());
            for (i, chunk) in profile.content_chunks.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, chunk.title);
            }
        }

        Ok(())
    }
}
