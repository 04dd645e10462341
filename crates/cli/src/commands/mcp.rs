//! MCP stdio command handler.

use clap::Args;
use tokio::io::BufReader;
use twin_core::{config::AppConfig, AppResult};
use twin_server::{run_stdio, McpServer};

use super::build_twin;

/// Serve MCP over stdin/stdout
#[derive(Args, Debug)]
pub struct McpCommand {}

impl McpCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing mcp command");

        let server = McpServer::new(build_twin(config)?);
        run_stdio(
            &server,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await
    }
}
