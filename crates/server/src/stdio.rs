//! MCP over stdio: one JSON-RPC message per line.
//!
//! stdout carries protocol messages only; logs go to stderr.

use crate::mcp::McpServer;
use crate::rpc::{to_value, RpcErrorCode, RpcRequest, RpcResponse, JSONRPC_VERSION};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use twin_core::AppResult;

/// Serve requests from `reader` until EOF, writing responses to `writer`.
pub async fn run_stdio<R, W>(server: &McpServer, reader: R, mut writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("MCP stdio transport ready");

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_line(server, &line).await else {
            continue;
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    tracing::info!("MCP stdio input closed");
    Ok(())
}

async fn handle_line(server: &McpServer, line: &str) -> Option<Value> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!("unparseable stdio line: {}", err);
            return Some(to_value(&RpcResponse::<Value>::err(
                None,
                RpcErrorCode::ParseError,
                "Parse error",
            )));
        }
    };

    let id = value.get("id").cloned().and_then(|v| serde_json::from_value(v).ok());

    if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Some(to_value(&RpcResponse::<Value>::err(
            id,
            RpcErrorCode::InvalidRequest,
            "Invalid request: must be JSONRPC 2.0",
        )));
    }

    match serde_json::from_value::<RpcRequest>(value) {
        Ok(req) => server.handle(req).await.map(|r| to_value(&r)),
        Err(err) => Some(to_value(&RpcResponse::<Value>::err(
            id,
            RpcErrorCode::InvalidRequest,
            format!("Invalid request: {err}"),
        ))),
    }
}
