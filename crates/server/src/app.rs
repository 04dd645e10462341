use axum::middleware;
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    chat::chat_handler,
    contact::contact_handler,
    health::health,
    mcp::{mcp_handler, mcp_status},
};
use crate::middleware::trace_with_correlation;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/mcp", get(mcp_status).post(mcp_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/contact", post(contact_handler))
        .layer(middleware::from_fn(trace_with_correlation))
        .with_state(state)
}
