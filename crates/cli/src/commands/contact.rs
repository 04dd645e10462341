//! Contact command handler.
//!
//! Sends a contact message through the configured relay; useful for
//! checking mail provider settings.

use clap::Args;
use twin_core::{config::AppConfig, AppError, AppResult};
use twin_mail::{ContactForm, ContactOutcome, ContactRelay};

/// Send a contact message to the site owner
#[derive(Args, Debug)]
pub struct ContactCommand {
    /// Sender name
    #[arg(long)]
    pub name: String,

    /// Sender email (used as reply-to)
    #[arg(long)]
    pub email: String,

    /// Message subject
    #[arg(long)]
    pub subject: String,

    /// Message body
    #[arg(long)]
    pub message: String,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContactCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing contact command");

        let relay = ContactRelay::from_config(&config.mail)?;
        let form = ContactForm::new(&self.name, &self.email, &self.subject, &self.message);
        let outcome = relay.send(&form).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        match outcome {
            ContactOutcome::Sent { message } => {
                if !self.json {
                    println!("{}", message);
                }
                Ok(())
            }
            ContactOutcome::Failed { error, .. } => Err(AppError::InvalidInput(error)),
        }
    }
}
