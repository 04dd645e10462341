use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{
    mcp::tool_summaries,
    rpc::{json_from_response, RpcErrorCode, RpcRequest, JSONRPC_VERSION},
    state::AppState,
};

pub const STATUS_MESSAGE: &str = "Digital Twin MCP Server is running";
const INVALID_REQUEST_MESSAGE: &str = "Invalid request: must be JSONRPC 2.0";

/// `GET /api/mcp`: liveness plus a short tool listing.
pub async fn mcp_status() -> Json<Value> {
    Json(json!({
        "status": STATUS_MESSAGE,
        "tools": tool_summaries(),
    }))
}

/// `POST /api/mcp`: one JSON-RPC request per body.
pub async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(req) = parse_request(&body) else {
        tracing::warn!("rejected non JSON-RPC 2.0 body");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": INVALID_REQUEST_MESSAGE })),
        )
            .into_response();
    };

    match state.mcp.handle(req).await {
        None => StatusCode::ACCEPTED.into_response(),
        Some(response) => {
            let status = if response.has_error(RpcErrorCode::MethodNotFound) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, json_from_response(&response)).into_response()
        }
    }
}

fn parse_request(body: &[u8]) -> Option<RpcRequest> {
    let value: Value = serde_json::from_slice(body).ok()?;
    if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return None;
    }
    serde_json::from_value(value).ok()
}
