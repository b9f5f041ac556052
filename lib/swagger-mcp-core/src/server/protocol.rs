use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Protocol revision answered when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC level failures, answered with an `error` object.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ProtocolError {
    /// The line is not JSON.
    #[display("Parse error: {_0}")]
    Parse(serde_json::Error),

    /// The JSON is not a request object.
    #[display("Invalid request: {_0}")]
    InvalidRequest(serde_json::Error),

    /// No handler for the method.
    #[display("Method not found: {method}")]
    MethodNotFound {
        /// The requested method.
        method: String,
    },

    /// The params do not fit the method.
    #[display("{message}")]
    InvalidParams {
        /// What is wrong with them.
        message: String,
    },

    /// The result could not be encoded.
    #[display("Internal error: {_0}")]
    Internal(serde_json::Error),
}

impl ProtocolError {
    /// The JSON-RPC error code.
    pub fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound { .. } => -32601,
            Self::InvalidParams { .. } => -32602,
            Self::Internal(_) => -32603,
        }
    }
}

/// An inbound request or notification.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct Message {
    /// Absent for notifications.
    #[serde(default)]
    pub(super) id: Option<Value>,
    pub(super) method: String,
    #[serde(default)]
    pub(super) params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InitializeParams {
    #[serde(default)]
    pub(super) protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallToolParams {
    pub(super) name: String,
    #[serde(default)]
    pub(super) arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct NoArguments {}

#[derive(Debug, Deserialize)]
pub(super) struct ReadResourceParams {
    pub(super) uri: String,
}

/// Decodes `params`, reporting the path of the offending field on failure.
pub(super) fn decode<T: DeserializeOwned>(params: Value, context: &str) -> Result<T, ProtocolError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_path_to_error::deserialize(params).map_err(|err| ProtocolError::InvalidParams {
        message: format!("Invalid {context}: {err}"),
    })
}

pub(super) fn success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

pub(super) fn failure(id: Value, error: &ProtocolError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        },
    })
}
