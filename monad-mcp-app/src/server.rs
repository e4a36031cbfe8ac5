//! MCP server over newline-delimited JSON-RPC.
//!
//! One request per line in, one response per line out. Notifications get no
//! response. All logging goes to stderr so stdout carries only protocol
//! traffic.

use crate::jsonrpc::{
    CallToolParams, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND, PARSE_ERROR, TOOL_NOT_FOUND,
};
use anyhow::{Context, Result};
use monad_mcp_config::MonadConfig;
use monad_mcp_tools::{Dispatcher, Report, ToolError, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "monad-mcp";

type Outcome = std::result::Result<Value, (i32, String)>;

pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Server with the standard tool modules over `config`.
    pub fn from_config(config: Arc<MonadConfig>) -> std::result::Result<Self, ToolError> {
        let registry = ToolRegistry::standard(config)?;
        Ok(Self::new(Dispatcher::new(Arc::new(registry))))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve until `reader` reaches end of input.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            "{} server started ({} operations)",
            SERVER_NAME,
            self.dispatcher.registry().count()
        );

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .context("Failed to read request")?;
            if read == 0 {
                break;
            }
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            debug!("Received: {}", String::from_utf8_lossy(&buf).trim_end());

            if let Some(response) = self.handle_bytes(&buf).await {
                let mut out = serde_json::to_string(&response)?;
                debug!("Sending: {}", out);
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        self.handle_bytes(line.as_bytes()).await
    }

    /// One raw request line. Bytes that are not a JSON-RPC request, including
    /// invalid UTF-8, get a parse error response.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        })
    }

    fn list_tools(&self) -> Outcome {
        let tools = serde_json::to_value(self.dispatcher.list())
            .map_err(|e| (INTERNAL_ERROR, e.to_string()))?;
        Ok(json!({ "tools": tools }))
    }

    async fn call_tool(&self, params: Option<Value>) -> Outcome {
        let params = params.ok_or_else(|| {
            (INVALID_PARAMS, "Missing params for tools/call".to_string())
        })?;
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid params for tools/call: {e}")))?;

        let arguments = params.arguments.unwrap_or(Value::Null);
        let report = match self.dispatcher.dispatch(&params.name, arguments).await {
            Ok(report) => report,
            Err(ToolError::OperationNotFound(name)) => {
                return Err((TOOL_NOT_FOUND, format!("Tool not found: {name}")));
            }
            Err(e) => {
                warn!("Operation {} failed: {}", params.name, e);
                Report::error(e.to_string())
            }
        };

        serde_json::to_value(report).map_err(|e| (INTERNAL_ERROR, e.to_string()))
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}
