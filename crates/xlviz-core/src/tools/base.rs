//! Core Tool trait and the error type returned at the tool boundary

use crate::error::XlvizError;
use crate::tools::types::{ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use std::time::Instant;

/// Error type for tool operations
///
/// The `Display` text of every variant is what the caller sees after the
/// `Error: ` prefix, so messages are written as complete sentences.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments provided to the tool
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A file, sheet or column that the call names does not exist
    #[error("{0}")]
    NotFound(String),

    /// A parameter value outside the supported set (aggregation, chart type)
    #[error("Unsupported parameter: {0}")]
    Unsupported(String),

    /// A filter expression could not be parsed or evaluated
    #[error("Invalid query: {0}")]
    Evaluation(String),

    /// Tool execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<ToolError> for XlvizError {
    fn from(err: ToolError) -> Self {
        XlvizError::tool("unknown", err.to_string())
    }
}

/// Base trait for all tools
///
/// Each tool has a schema advertised through `tools/list` and execution
/// logic invoked by `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's unique name (e.g., "read_excel")
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's JSON schema for input parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if arguments are invalid, the workbook cannot be
    /// read or the requested columns are missing.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;

    /// Validate the tool call arguments
    ///
    /// Called before `execute()`. Default implementation checks that every
    /// parameter the schema marks as required is present.
    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        let schema = self.schema();
        let required = schema
            .parameters
            .get("required")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();

        for name in required.iter().filter_map(|v| v.as_str()) {
            if call.get_argument::<serde_json::Value>(name).is_none() {
                return Err(ToolError::InvalidArguments(format!(
                    "Missing required parameter '{}'",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Whether this tool only reads data without side effects
    fn is_read_only(&self) -> bool {
        true
    }

    /// Render the tool result for the caller
    ///
    /// Default shows output for success, error message for failures.
    fn render_result(&self, result: &ToolResult) -> String {
        if result.success {
            result.output.clone().unwrap_or_default()
        } else {
            format!("Error: {}", result.error.clone().unwrap_or_default())
        }
    }

    /// Execute the tool with timing and error handling
    ///
    /// Wraps `execute()` with validation and timing, converting errors to
    /// `ToolResult::error`. Always returns a `ToolResult`.
    async fn execute_with_timing(&self, call: &ToolCall) -> ToolResult {
        let start_time = Instant::now();

        if let Err(err) = self.validate(call) {
            return ToolResult::error(&call.id, self.name(), err.to_string())
                .with_execution_time(start_time.elapsed().as_millis() as u64);
        }

        match self.execute(call).await {
            Ok(mut result) => {
                result.execution_time_ms = Some(start_time.elapsed().as_millis() as u64);
                result
            }
            Err(err) => {
                tracing::debug!(tool = self.name(), error = %err, "tool call failed");
                ToolResult::error(&call.id, self.name(), err.to_string())
                    .with_execution_time(start_time.elapsed().as_millis() as u64)
            }
        }
    }
}
