//! JSON-RPC 2.0 envelopes as seen by the server
//!
//! Incoming lines are classified into requests (method and id),
//! notifications (method, no id) and stray responses (id, no method).
//! The server only ever writes responses.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Protocol revision announced from `initialize`
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC version every message must carry
pub const JSONRPC_VERSION: &str = "2.0";

/// Request ID (string, number, or null for unreadable requests)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Null,
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A call the client expects an answer to
#[derive(Debug, Clone, PartialEq)]
pub struct McpRequest {
    pub id: RequestId,
    pub method: String,
    pub params: Option<Value>,
}

/// A classified client message
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Request(McpRequest),
    /// Method name of a notification
    Notification(String),
    /// A response to something the server never sent
    Response,
}

#[derive(Deserialize)]
struct Envelope {
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<RequestId>,
    method: Option<String>,
    params: Option<Value>,
}

impl Incoming {
    /// Classify a parsed JSON value
    ///
    /// Fails with an invalid-request error when the value is not an object,
    /// does not declare `"jsonrpc": "2.0"`, or has neither id nor method.
    pub fn classify(value: Value) -> Result<Self, McpRpcError> {
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| McpRpcError::invalid_request().with_data(json!(e.to_string())))?;
        if envelope.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            return Err(McpRpcError::invalid_request().with_data(json!("jsonrpc must be \"2.0\"")));
        }

        match (envelope.id, envelope.method) {
            (Some(id), Some(method)) => Ok(Self::Request(McpRequest {
                id,
                method,
                params: envelope.params,
            })),
            (None, Some(method)) => Ok(Self::Notification(method)),
            (Some(_), None) => Ok(Self::Response),
            (None, None) => Err(McpRpcError::invalid_request()),
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpRpcError>,
}

impl McpResponse {
    pub fn success(id: impl Into<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: impl Into<RequestId>, error: McpRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach detail, usually the underlying parse error
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid request")
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {}", method))
    }

    pub fn invalid_params() -> Self {
        Self::new(-32602, "Invalid params")
    }

    pub fn internal_error() -> Self {
        Self::new(-32603, "Internal error")
    }
}

/// Methods the server answers
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCES_TEMPLATES_LIST: &str = "resources/templates/list";
    pub const RESOURCES_READ: &str = "resources/read";
}
