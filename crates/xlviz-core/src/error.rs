//! Error types for xlviz

use thiserror::Error;

/// Result type alias for xlviz operations
pub type XlvizResult<T> = Result<T, XlvizError>;

/// Main error type for xlviz
#[derive(Error, Debug, Clone)]
pub enum XlvizError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Tool execution errors
    #[error("Tool error: {tool_name}: {message}")]
    Tool { tool_name: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),
}

impl XlvizError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error carrying the operation that failed
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new tool error
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Context attached to the error, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XlvizError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
