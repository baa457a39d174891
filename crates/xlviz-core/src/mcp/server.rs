//! MCP server dispatcher
//!
//! Requests are handled strictly one at a time: a line is read, dispatched,
//! and its response written before the next line is read.

use super::error::McpError;
use super::protocol::{
    Incoming, MCP_PROTOCOL_VERSION, McpRequest, McpResponse, McpRpcError, RequestId, methods,
};
use super::resource::ResourceProvider;
use super::transport::LineTransport;
use super::types::{
    CallToolParams, InitializeResult, McpCapabilities, McpResourceContent, McpServerInfo, McpTool,
    McpToolResult, ReadResourceParams, ResourceCapabilities, ToolCapabilities,
};
use crate::tools::{ToolCall, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::{debug, info, warn};

/// MCP server routing requests to registered tools and resources
pub struct McpServer {
    info: McpServerInfo,
    tools: ToolRegistry,
    resources: Vec<Arc<dyn ResourceProvider>>,
    call_counter: AtomicU64,
}

impl McpServer {
    /// Create a server with no tools
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: McpServerInfo {
                name: name.into(),
                version: version.into(),
            },
            tools: ToolRegistry::new(),
            resources: Vec::new(),
            call_counter: AtomicU64::new(0),
        }
    }

    /// Serve the given tools
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Add a resource provider
    pub fn with_resource(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.resources.push(provider);
        self
    }

    /// Registered tools
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Serve over the process's stdin and stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<(), McpError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve over an arbitrary line-oriented reader/writer pair
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            "{} {} ready ({} tools)",
            self.info.name,
            self.info.version,
            self.tools.len()
        );
        let mut transport = LineTransport::new(reader, writer);

        while let Some(line) = transport.receive_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                transport.send(&response).await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw line; `None` when no response is due
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(McpResponse::error(
                    RequestId::Null,
                    McpRpcError::parse_error().with_data(json!(e.to_string())),
                ));
            }
        };

        match Incoming::classify(value) {
            Ok(Incoming::Request(request)) => Some(self.handle_request(request).await),
            Ok(Incoming::Notification(method)) => {
                debug!("Notification: {}", method);
                None
            }
            Ok(Incoming::Response) => {
                debug!("Ignoring response message from client");
                None
            }
            Err(error) => Some(McpResponse::error(RequestId::Null, error)),
        }
    }

    /// Dispatch a request to its method handler
    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = request.id.clone();
        debug!("Request {} {}", id, request.method);

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => Ok(self.list_tools()),
            methods::TOOLS_CALL => self.call_tool(request.params).await,
            methods::RESOURCES_LIST => Ok(json!({ "resources": [] })),
            methods::RESOURCES_TEMPLATES_LIST => Ok(self.list_resource_templates()),
            methods::RESOURCES_READ => self.read_resource(request.params).await,
            other => Err(McpRpcError::method_not_found(other)),
        };

        match outcome {
            Ok(result) => McpResponse::success(id, result),
            Err(error) => McpResponse::error(id, error),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, McpRpcError> {
        let requested = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(MCP_PROTOCOL_VERSION);
        info!("Client initializing with protocol {}", requested);

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: McpCapabilities {
                tools: Some(ToolCapabilities::default()),
                resources: Some(ResourceCapabilities::default()),
            },
            server_info: self.info.clone(),
        };
        to_value(&result)
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<McpTool> = self
            .tools
            .all_tools()
            .iter()
            .map(|tool| {
                let schema = tool.schema();
                McpTool::new(schema.name)
                    .with_description(schema.description)
                    .with_input_schema(schema.parameters)
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, McpRpcError> {
        let params: CallToolParams = parse_params(params)?;
        let tool = self
            .tools
            .get(&params.name)
            .cloned()
            .ok_or_else(|| McpRpcError::from(McpError::tool_not_found(&params.name)))?;

        let call_id = format!("call-{}", self.call_counter.fetch_add(1, Ordering::Relaxed) + 1);
        let call = ToolCall::new(
            call_id,
            params.name.clone(),
            params.arguments.unwrap_or_default(),
        );

        info!("Executing tool {}", params.name);
        let result = tool.execute_with_timing(&call).await;
        debug!(
            tool = %params.name,
            success = result.success,
            elapsed_ms = result.execution_time_ms.unwrap_or_default(),
            "Tool finished"
        );

        to_value(&McpToolResult::text(
            tool.render_result(&result),
            !result.success,
        ))
    }

    fn list_resource_templates(&self) -> Value {
        let templates: Vec<_> = self.resources.iter().map(|p| p.template()).collect();
        json!({ "resourceTemplates": templates })
    }

    async fn read_resource(&self, params: Option<Value>) -> Result<Value, McpRpcError> {
        let params: ReadResourceParams = parse_params(params)?;
        let provider = self
            .resources
            .iter()
            .find(|p| p.matches(&params.uri))
            .ok_or_else(|| McpRpcError::from(McpError::resource_not_found(&params.uri)))?;

        let text = provider.read(&params.uri).await;
        let content = McpResourceContent {
            uri: params.uri,
            mime_type: provider.template().mime_type,
            text: Some(text),
        };
        Ok(json!({ "contents": [content] }))
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, McpRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|e| {
        McpRpcError::invalid_params().with_data(json!(e.to_string()))
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, McpRpcError> {
    serde_json::to_value(value)
        .map_err(|e| McpRpcError::internal_error().with_data(json!(e.to_string())))
}
