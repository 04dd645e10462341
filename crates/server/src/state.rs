use crate::mcp::McpServer;
use std::sync::Arc;
use twin_knowledge::DigitalTwin;
use twin_mail::ContactRelay;

/// Shared, read-only service state.
#[derive(Clone)]
pub struct AppState {
    pub twin: Arc<DigitalTwin>,
    pub relay: Arc<ContactRelay>,
    pub mcp: McpServer,
}

impl AppState {
    pub fn new(twin: Arc<DigitalTwin>, relay: Arc<ContactRelay>) -> Self {
        let mcp = McpServer::new(twin.clone());
        Self { twin, relay, mcp }
    }
}
