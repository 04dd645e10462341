//! Ask command handler.
//!
//! Answers one question from the profile, the same way the chat endpoint
//! does.

use clap::Args;
use twin_core::{config::AppConfig, AppError, AppResult};
use twin_knowledge::format_with_sources;

use super::build_twin;

/// Ask the digital twin a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Number of profile chunks used as context
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Print the chat reply JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Only show ranked chunks; do not call the language model
    #[arg(long)]
    pub search_only: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question.join(" ");
        if question.trim().is_empty() {
            return Err(AppError::InvalidInput("No question provided".to_string()));
        }

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if self.temperature.is_some() {
            config.temperature = self.temperature;
        }

        let twin = build_twin(&config)?;

        if self.search_only {
            let results = twin.search(&question)?;
            if self.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!("{:>6.1}  {}", result.score, result.title);
                }
            }
            return Ok(());
        }

        if self.json {
            let reply = twin.reply(&question).await;
            println!("{}", serde_json::to_string_pretty(&reply)?);
            return Ok(());
        }

        let answer = twin.ask(&question).await?;
        println!("{}", format_with_sources(&answer));

        Ok(())
    }
}
