//! Tool abstractions shared by every spreadsheet tool

pub mod base;
pub mod registry;
pub mod types;

pub use base::{Tool, ToolError};
pub use registry::ToolRegistry;
pub use types::{ToolCall, ToolParameter, ToolResult, ToolSchema};
