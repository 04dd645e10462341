//! JSON-RPC 2.0 envelope types.

use axum::Json;
use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications; an explicit `null` is [`RpcId::Null`]
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<RpcId>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RpcId {
    String(String),
    Number(i64),
    Null,
}

/// Only called when `id` is present, so `null` still yields `Some`.
fn present_id<'de, D>(deserializer: D) -> Result<Option<RpcId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RpcId::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse<T> {
    pub jsonrpc: &'static str,
    /// `null` when the request id could not be determined
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl<T> RpcResponse<T> {
    pub fn ok(id: Option<RpcId>, result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<RpcId>, code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(RpcError {
                code: code.as_i64(),
                message: message.into(),
            }),
        }
    }

    /// Whether this response carries the given error code.
    pub fn has_error(&self, code: RpcErrorCode) -> bool {
        self.error.as_ref().is_some_and(|e| e.code == code.as_i64())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Internal,
}

impl RpcErrorCode {
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::Internal => -32603,
        }
    }
}

pub fn to_value<T: Serialize>(response: &RpcResponse<T>) -> serde_json::Value {
    serde_json::to_value(response).unwrap_or_else(|_| {
        serde_json::json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": null,
            "error": { "code": RpcErrorCode::Internal.as_i64(), "message": "internal serialization error" }
        })
    })
}

pub fn json_from_response<T: Serialize>(response: &RpcResponse<T>) -> Json<serde_json::Value> {
    Json(to_value(response))
}
