//! Serve command handler.

use clap::Args;
use std::sync::Arc;
use twin_core::{config::AppConfig, AppResult};
use twin_mail::ContactRelay;
use twin_server::AppState;

use super::build_twin;

/// Run the HTTP server (chat, contact and MCP endpoints)
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind, e.g. 0.0.0.0:3000
    #[arg(long, env = "TWIN_BIND_ADDR")]
    pub addr: Option<String>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let twin = build_twin(config)?;
        let relay = ContactRelay::from_config(&config.mail)?;
        if relay.transport_names().is_empty() {
            tracing::info!("No mail provider configured; contact messages will be logged");
        }

        let addr = self.addr.as_deref().unwrap_or(&config.bind_addr);
        twin_server::serve(AppState::new(twin, Arc::new(relay)), addr).await
    }
}
