//! MCP tool server over JSON-RPC.
//!
//! Transport independent: the HTTP route and the stdio loop both hand
//! parsed requests to [`McpServer::handle`].

use crate::rpc::{RpcErrorCode, RpcRequest, RpcResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use twin_knowledge::{format_with_sources, DigitalTwin, INVALID_QUESTION_MESSAGE};

pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "digital-twin-mcp";

pub const ASK_TOOL: &str = "ask_digital_twin";
pub const SUMMARY_TOOL: &str = "get_profile_summary";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Short tool listing for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

pub fn initialize_result(params: Option<InitializeParams>) -> InitializeResult {
    let protocol_version = params
        .and_then(|p| p.protocol_version)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());

    InitializeResult {
        protocol_version,
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
    }
}

pub fn tools_list_result() -> ToolsListResult {
    ToolsListResult {
        tools: vec![
            ToolDescriptor {
                name: ASK_TOOL.to_string(),
                description: "Ask questions about the profile owner's professional background, skills, projects, and experience. Answers are based on their profile information.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "question": {
                            "type": "string",
                            "description": "Your question about the digital twin's background, skills, or experience"
                        }
                    },
                    "required": ["question"]
                }),
            },
            ToolDescriptor {
                name: SUMMARY_TOOL.to_string(),
                description: "Get a summary of the digital twin's personal information and key details".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        ],
    }
}

pub fn tool_summaries() -> Vec<ToolSummary> {
    vec![
        ToolSummary {
            name: ASK_TOOL,
            description: "Ask questions about the profile owner's professional background",
        },
        ToolSummary {
            name: SUMMARY_TOOL,
            description: "Get a summary of the digital twin profile",
        },
    ]
}

/// Dispatches MCP methods to the digital twin.
#[derive(Clone)]
pub struct McpServer {
    twin: Arc<DigitalTwin>,
}

impl McpServer {
    pub fn new(twin: Arc<DigitalTwin>) -> Self {
        Self { twin }
    }

    /// Handle one request. Notifications get no response.
    pub async fn handle(&self, req: RpcRequest) -> Option<RpcResponse<Value>> {
        tracing::debug!(method = %req.method, "mcp request");

        if req.is_notification() {
            tracing::debug!(method = %req.method, "ignoring notification");
            return None;
        }

        let id = req.id.clone();
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "ping" => RpcResponse::ok(id, serde_json::json!({})),
            "tools/list" => ok_value(id, tools_list_result()),
            "tools/call" => self.handle_tools_call(req).await,
            other => {
                tracing::warn!(method = %other, "unknown method");
                RpcResponse::err(id, RpcErrorCode::MethodNotFound, "Method not found")
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, req: RpcRequest) -> RpcResponse<Value> {
        let params = if req.params.is_null() {
            None
        } else {
            match serde_json::from_value(req.params) {
                Ok(v) => Some(v),
                Err(err) => {
                    return RpcResponse::err(
                        req.id,
                        RpcErrorCode::InvalidParams,
                        format!("invalid initialize params: {err}"),
                    );
                }
            }
        };
        ok_value(req.id, initialize_result(params))
    }

    async fn handle_tools_call(&self, req: RpcRequest) -> RpcResponse<Value> {
        let params = match serde_json::from_value::<ToolCallParams>(req.params) {
            Ok(p) => p,
            Err(err) => {
                return RpcResponse::err(
                    req.id,
                    RpcErrorCode::InvalidParams,
                    format!("invalid tools/call params: {err}"),
                );
            }
        };

        tracing::info!(tool = %params.name, "tool call");
        ok_value(req.id, self.call_tool(&params.name, &params.arguments).await)
    }

    /// Run a tool by name. Failures are reported inside the result.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match name {
            ASK_TOOL => {
                let question = arguments
                    .get("question")
                    .and_then(Value::as_str)
                    .filter(|q| !q.trim().is_empty());

                let Some(question) = question else {
                    return ToolCallResult::error(INVALID_QUESTION_MESSAGE);
                };

                match self.twin.ask(question).await {
                    Ok(answer) => ToolCallResult::text(format_with_sources(&answer)),
                    Err(e) => {
                        tracing::error!("{} failed: {}", ASK_TOOL, e);
                        ToolCallResult::error(format!("Error: {}", e))
                    }
                }
            }
            SUMMARY_TOOL => match self.twin.profile_summary() {
                Ok(summary) => ToolCallResult::text(summary),
                Err(e) => {
                    tracing::error!("{} failed: {}", SUMMARY_TOOL, e);
                    ToolCallResult::error(format!("Error: {}", e))
                }
            },
            other => ToolCallResult::error(format!("Unknown tool: {}", other)),
        }
    }
}

fn ok_value<T: Serialize>(id: Option<crate::rpc::RpcId>, result: T) -> RpcResponse<Value> {
    match serde_json::to_value(result) {
        Ok(value) => RpcResponse::ok(id, value),
        Err(err) => RpcResponse::err(
            id,
            RpcErrorCode::Internal,
            format!("failed to serialize result: {err}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcId;
    use serde_json::json;

    #[test]
    fn test_initialize_defaults_protocol() {
        let result = initialize_result(None);
        assert_eq!(result.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(result.server_info.name, SERVER_NAME);

        let result = initialize_result(Some(InitializeParams {
            protocol_version: Some("2024-11-05".to_string()),
        }));
        assert_eq!(result.protocol_version, "2024-11-05");

        let result = initialize_result(Some(InitializeParams {
            protocol_version: Some("  ".to_string()),
        }));
        assert_eq!(result.protocol_version, DEFAULT_PROTOCOL_VERSION);
    }

    #[test]
    fn test_tools_list_shape() {
        let value = serde_json::to_value(tools_list_result()).unwrap();
        let tools = value["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], ASK_TOOL);
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["question"]));
        assert_eq!(tools[1]["name"], SUMMARY_TOOL);
    }

    #[test]
    fn test_tool_result_wire_shape() {
        assert_eq!(
            serde_json::to_value(ToolCallResult::text("hi")).unwrap(),
            json!({ "content": [{ "type": "text", "text": "hi" }] })
        );
        assert_eq!(
            serde_json::to_value(ToolCallResult::error("bad")).unwrap(),
            json!({ "content": [{ "type": "text", "text": "bad" }], "isError": true })
        );
    }

    #[test]
    fn test_ok_value() {
        let response = ok_value(Some(RpcId::Number(3)), json!({ "a": 1 }));
        assert_eq!(response.result, Some(json!({ "a": 1 })));
    }
}
