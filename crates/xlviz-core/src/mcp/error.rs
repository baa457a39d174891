//! MCP error types

use thiserror::Error;

use super::protocol::McpRpcError;

/// Failures while serving MCP
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
}

impl McpError {
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound(name.into())
    }

    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound(uri.into())
    }

    /// JSON-RPC error code reported for this error
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::Serialization(_) => -32700,
            Self::ToolNotFound(_) | Self::ResourceNotFound(_) => -32602,
            Self::Transport(_) => -32603,
        }
    }
}

impl From<McpError> for McpRpcError {
    fn from(err: McpError) -> Self {
        Self::new(err.rpc_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_maps_to_invalid_params() {
        let rpc: McpRpcError = McpError::tool_not_found("draw_map").into();
        assert_eq!(rpc.code, -32602);
        assert_eq!(rpc.message, "Tool not found: draw_map");
    }

    #[test]
    fn test_io_failure_is_a_transport_error() {
        let err: McpError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert_eq!(err.rpc_code(), -32603);
        assert_eq!(err.to_string(), "Transport error: pipe closed");
    }
}
