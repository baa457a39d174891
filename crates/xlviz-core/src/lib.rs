//! xlviz core library
//!
//! Shared plumbing for the xlviz server: configuration loading, the error
//! types, the [`Tool`] trait with its registry, and the MCP protocol types
//! plus the stdio server that routes `tools/call` and `resources/read`
//! requests to registered tools and resource providers.

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

pub use config::{ChartConfig, Config, LoggingConfig, WorkbookConfig};
pub use error::{XlvizError, XlvizResult};
pub use mcp::{McpServer, ResourceProvider};
pub use tools::{Tool, ToolCall, ToolError, ToolRegistry, ToolResult, ToolSchema};
