//! Model Context Protocol server over newline-delimited JSON-RPC.
//!
//! Each inbound line is handled on its own task. Responses go through a
//! channel to a single writer task, so they may be written out of order.

use std::io;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::tools::{
    DOCUMENTATION_URI, LOAD_DOCUMENT_TOOL, MAKE_REQUEST_TOOL, SwaggerTools, resource_definitions,
    tool_definitions,
};
use crate::{RequestDescriptor, ToolOutput};

mod protocol;
pub use self::protocol::{DEFAULT_PROTOCOL_VERSION, ProtocolError};
use self::protocol::{
    CallToolParams, InitializeParams, Message, NoArguments, ReadResourceParams, decode, failure,
    success,
};

/// Channel buffer size for outbound responses.
const CHANNEL_BUFFER_SIZE: usize = 64;

/// Name advertised in `serverInfo`.
pub const SERVER_NAME: &str = "swagger-mcp";

/// Stdio MCP server exposing [`SwaggerTools`].
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: SwaggerTools,
}

impl McpServer {
    /// Creates a server.
    pub fn new(tools: SwaggerTools) -> Self {
        Self { tools }
    }

    /// Serves requests read from `reader` until end of input.
    ///
    /// Returns once every in-flight request has been answered.
    ///
    /// # Errors
    ///
    /// Fails on read or write errors of the underlying streams.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<String>(CHANNEL_BUFFER_SIZE);
        let writing = tokio::spawn(writer_task(receiver, writer));

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let server = self.clone();
            let sender = sender.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    // the writer only stops on I/O errors, reported below
                    let _ = sender.send(response).await;
                }
            });
        }
        info!("input closed, waiting for pending responses");
        drop(sender);

        writing.await.map_err(io::Error::other)?
    }

    /// Handles one JSON-RPC line, returning the response line if one is due.
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let raw = match serde_json::from_str::<Value>(line) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "malformed JSON-RPC line");
                return Some(failure(Value::Null, &ProtocolError::Parse(err)).to_string());
            }
        };
        let message = match serde_json::from_value::<Message>(raw.clone()) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "invalid JSON-RPC request");
                let id = raw.get("id").cloned().unwrap_or_default();
                return Some(failure(id, &ProtocolError::InvalidRequest(err)).to_string());
            }
        };

        let Message { id, method, params } = message;
        let Some(id) = id else {
            debug!(%method, "notification");
            return None;
        };

        debug!(%method, %id, "handling request");
        let response = match self.handle_request(&method, params).await {
            Ok(result) => success(id, result),
            Err(error) => {
                debug!(%method, %error, "request failed");
                failure(id, &error)
            }
        };
        Some(response.to_string())
    }

    async fn handle_request(&self, method: &str, params: Value) -> Result<Value, ProtocolError> {
        match method {
            "initialize" => {
                let params: InitializeParams = decode(params, "initialize params")?;
                let protocol_version = params
                    .protocol_version
                    .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());
                Ok(json!({
                    "protocolVersion": protocol_version,
                    "capabilities": {
                        "tools": {},
                        "resources": {},
                    },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }))
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => {
                let params: CallToolParams = decode(params, "tool call params")?;
                let output = self.call_tool(params).await?;
                serde_json::to_value(output).map_err(ProtocolError::Internal)
            }
            "resources/list" => Ok(json!({ "resources": resource_definitions() })),
            "resources/read" => {
                let params: ReadResourceParams = decode(params, "resource params")?;
                if params.uri != DOCUMENTATION_URI {
                    return Err(ProtocolError::InvalidParams {
                        message: format!("Resource not found: {}", params.uri),
                    });
                }
                let contents = self.tools.read_documentation().await;
                Ok(json!({ "contents": [contents] }))
            }
            _ => Err(ProtocolError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }

    async fn call_tool(&self, params: CallToolParams) -> Result<ToolOutput, ProtocolError> {
        let CallToolParams { name, arguments } = params;
        let arguments = arguments.unwrap_or_default();
        match name.as_str() {
            MAKE_REQUEST_TOOL => {
                let request: RequestDescriptor =
                    decode(arguments, "arguments for tool makeRequest")?;
                Ok(self.tools.make_request(&request).await)
            }
            LOAD_DOCUMENT_TOOL => {
                let NoArguments {} = decode(arguments, "arguments for tool loadSwaggerDoc")?;
                Ok(self.tools.load_document().await)
            }
            _ => Err(ProtocolError::InvalidParams {
                message: format!("Unknown tool: {name}"),
            }),
        }
    }
}

async fn writer_task<W>(mut receiver: mpsc::Receiver<String>, mut writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = receiver.recv().await {
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
