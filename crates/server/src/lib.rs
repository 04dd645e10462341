//! HTTP and stdio surfaces for the digital twin.
//!
//! Routes:
//! - `GET /health`
//! - `GET|POST /api/mcp` (MCP JSON-RPC)
//! - `POST /api/chat`
//! - `POST /api/contact`

pub mod app;
pub mod handlers;
pub mod mcp;
pub mod middleware;
pub mod rpc;
pub mod state;
pub mod stdio;

pub use app::router;
pub use mcp::McpServer;
pub use state::AppState;
pub use stdio::run_stdio;

use std::net::SocketAddr;
use twin_core::{AppError, AppResult};

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState, addr: &str) -> AppResult<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", addr, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("digital twin listening on http://{addr}");
    tracing::info!("MCP JSON-RPC endpoint: http://{addr}/api/mcp");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!("SIGTERM handler unavailable: {}", err);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
