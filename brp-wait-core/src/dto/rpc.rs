//! JSON-RPC DTOs
//!
//! Request and response envelopes for the Bevy Remote Protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Method used to probe the remote; lists the methods it serves
pub const LIST_METHOD: &str = "bevy/list";

/// Identifier of the readiness request
pub const LIST_REQUEST_ID: u64 = 1;

/// A JSON-RPC request
///
/// Field order matches the wire payload: `jsonrpc`, `method`, `id`, `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Remote method name
    pub method: String,

    /// Request identifier echoed back by the server
    pub id: u64,

    /// Named parameters
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Creates a request with no parameters
    pub fn new(method: impl Into<String>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            id,
            params: Map::new(),
        }
    }

    /// The fixed readiness request: `bevy/list` with id 1 and empty params
    pub fn list() -> Self {
        Self::new(LIST_METHOD, LIST_REQUEST_ID)
    }
}

/// A JSON-RPC response envelope
///
/// Exactly one of `result` and `error` is expected, but neither is enforced;
/// the poller only uses this for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version reported by the server
    #[serde(default)]
    pub jsonrpc: Option<String>,

    /// Identifier of the request this answers (number, string or null)
    #[serde(default)]
    pub id: Value,

    /// Successful result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Whether this response answers the request with the given id
    pub fn answers(&self, id: u64) -> bool {
        self.id.as_u64() == Some(id)
    }

    /// Number of entries in an array result (e.g. the methods from `bevy/list`)
    pub fn result_len(&self) -> Option<usize> {
        self.result.as_ref()?.as_array().map(Vec::len)
    }
}

/// A JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
