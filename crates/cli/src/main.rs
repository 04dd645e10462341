//! Digital Twin CLI
//!
//! Main entry point for the `twin` command-line tool: serves the portfolio
//! backend over HTTP or MCP stdio, and exposes the same operations for use
//! from a terminal.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ContactCommand, McpCommand, ProfileCommand, ServeCommand};
use std::path::PathBuf;
use tracing::Instrument;
use twin_core::{config::AppConfig, logging, AppResult};

/// Digital Twin - answer questions about a portfolio profile
#[derive(Parser, Debug)]
#[command(name = "twin")]
#[command(about = "Digital twin portfolio backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "TWIN_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "TWIN_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider (groq, ollama, mock)
    #[arg(short, long, global = true, env = "TWIN_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "TWIN_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the digital twin a question
    Ask(AskCommand),

    /// Show the profile summary
    Profile(ProfileCommand),

    /// Send a contact message
    Contact(ContactCommand),

    /// Run the HTTP server
    Serve(ServeCommand),

    /// Serve MCP over stdin/stdout
    Mcp(McpCommand),
}

impl Cli {
    /// Environment lookup with command-line values taking the place of
    /// their variables, so the config file and provider key resolve
    /// against what the user asked for.
    fn env_lookup(&self, key: &str) -> Option<String> {
        let flag = match key {
            "TWIN_WORKSPACE" => self.workspace.as_ref().map(|p| p.display().to_string()),
            "TWIN_CONFIG" => self.config.as_ref().map(|p| p.display().to_string()),
            "TWIN_PROVIDER" => self.provider.clone(),
            "TWIN_MODEL" => self.model.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_with(|key| cli.env_lookup(key))?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace.clone(),
        cli.config.clone(),
        cli.provider.clone(),
        cli.model.clone(),
        cli.log_level.clone(),
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("Digital Twin CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Profile: {:?}", config.profile_path());
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Profile(_) => "profile",
        Commands::Contact(_) => "contact",
        Commands::Serve(_) => "serve",
        Commands::Mcp(_) => "mcp",
    };
    let span = tracing::info_span!("command", name = command_name);

    // Route to command handlers
    let result = async {
        match cli.command {
            Commands::Ask(cmd) => cmd.execute(&config).await,
            Commands::Profile(cmd) => cmd.execute(&config).await,
            Commands::Contact(cmd) => cmd.execute(&config).await,
            Commands::Serve(cmd) => cmd.execute(&config).await,
            Commands::Mcp(cmd) => cmd.execute(&config).await,
        }
    }
    .instrument(span)
    .await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "twin", "--provider", "mock", "ask", "what", "do", "you", "build", "--top-k", "2",
        ])
        .unwrap();

        assert_eq!(cli.provider.as_deref(), Some("mock"));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question.join(" "), "what do you build");
                assert_eq!(cmd.top_k, Some(2));
                assert_eq!(cmd.temperature, None);
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_profile_prompts_and_temperature() {
        let cli = Cli::try_parse_from(["twin", "profile", "--prompts"]).unwrap();
        assert!(matches!(cli.command, Commands::Profile(ref cmd) if cmd.prompts));

        let cli = Cli::try_parse_from(["twin", "ask", "hi", "--temperature", "0.5"]).unwrap();
        assert!(matches!(cli.command, Commands::Ask(ref cmd) if cmd.temperature == Some(0.5)));
    }

    #[test]
    fn test_parse_contact_requires_fields() {
        assert!(Cli::try_parse_from(["twin", "contact", "--name", "Ada"]).is_err());

        let cli = Cli::try_parse_from([
            "twin", "contact", "--name", "Ada", "--email", "ada@example.com", "--subject", "Hi",
            "--message", "Hello",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Contact(_)));
    }

    #[test]
    fn test_flags_take_the_place_of_environment() {
        let cli = Cli::try_parse_from(["twin", "--model", "m-flag", "--workspace", "/tmp", "mcp"])
            .unwrap();

        assert_eq!(cli.env_lookup("TWIN_MODEL").as_deref(), Some("m-flag"));
        assert_eq!(cli.env_lookup("TWIN_WORKSPACE").as_deref(), Some("/tmp"));
    }
}
