//! JSON-RPC 2.0 envelope types.

use serde::{Deserialize, Serialize};

/// Method names used by the chain client.
pub const BLOCK_NUMBER: &str = "eth_blockNumber";
pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";

/// Outgoing request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Incoming response envelope. `result` is decoded by the caller; a JSON
/// `null` result lands here as `None`.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// The `error` member of a failed call.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
