//! Model Context Protocol (MCP) server side
//!
//! Exposes registered tools and resource templates to an MCP client over a
//! newline-delimited JSON-RPC stream (normally the process's stdin/stdout).
//!
//! ## Example
//!
//! ```rust,ignore
//! use xlviz_core::mcp::McpServer;
//!
//! let server = McpServer::new("xlviz", "0.4.1").with_tools(registry);
//! server.serve_stdio().await?;
//! ```

pub mod error;
pub mod protocol;
pub mod resource;
pub mod server;
pub mod transport;
pub mod types;

pub use error::McpError;
pub use protocol::{Incoming, McpRequest, McpResponse, McpRpcError, RequestId};
pub use resource::ResourceProvider;
pub use server::McpServer;
pub use transport::LineTransport;
pub use types::{
    McpCapabilities, McpContent, McpResourceContent, McpResourceTemplate, McpServerInfo, McpTool,
    McpToolResult,
};
