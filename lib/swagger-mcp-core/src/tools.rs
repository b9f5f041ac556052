//! The operations exposed to callers and their response envelopes.

use serde::Serialize;
use serde_json::{Value, json};

use crate::{DispatchError, Dispatcher, DocumentError, RequestDescriptor, RequestFailure};

/// Logical address of the documentation resource.
pub const DOCUMENTATION_URI: &str = "swagger://documentation";

/// Name of the documentation resource.
pub const DOCUMENTATION_RESOURCE: &str = "swagger-doc";

/// Name of the tool returning the document.
pub const LOAD_DOCUMENT_TOOL: &str = "loadSwaggerDoc";

/// Name of the tool calling an operation.
pub const MAKE_REQUEST_TOOL: &str = "makeRequest";

/// One text block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

/// Uniform response envelope of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// The payload, or the error message.
    pub content: Vec<Content>,
    /// Set when the call failed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful result.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// A failed result.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// The text of the first content block.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }
}

/// Contents of the documentation resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// Always [`DOCUMENTATION_URI`].
    pub uri: String,
    /// Media type of `text`.
    pub mime_type: String,
    /// The document, or an error message starting with `Error`.
    pub text: String,
}

/// The tools and the resource backed by a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct SwaggerTools {
    dispatcher: Dispatcher,
}

impl SwaggerTools {
    /// Wraps a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// `loadSwaggerDoc`: the full document, pretty printed.
    pub async fn load_document(&self) -> ToolOutput {
        match self.document_text().await {
            Ok(text) => ToolOutput::success(text),
            Err(error) => ToolOutput::failure(loading_error(&error)),
        }
    }

    /// `makeRequest`: runs the dispatch pipeline.
    pub async fn make_request(&self, request: &RequestDescriptor) -> ToolOutput {
        let result = self
            .dispatcher
            .dispatch(request)
            .await
            .and_then(|value| {
                serde_json::to_string_pretty(&value)
                    .map_err(|err| DispatchError::from(RequestFailure::Json(err)))
            });
        match result {
            Ok(text) => ToolOutput::success(text),
            Err(error) => ToolOutput::failure(error.to_string()),
        }
    }

    /// Reads the documentation resource.
    ///
    /// Failures are embedded in the text, there is no error flag.
    pub async fn read_documentation(&self) -> ResourceContents {
        let text = self
            .document_text()
            .await
            .unwrap_or_else(|error| loading_error(&error));
        ResourceContents {
            uri: DOCUMENTATION_URI.to_string(),
            mime_type: "application/json".to_string(),
            text,
        }
    }

    async fn document_text(&self) -> Result<String, DocumentError> {
        let document = self.dispatcher.cache().get().await?;
        document.to_pretty_json().map_err(DocumentError::ParseFailure)
    }
}

fn loading_error(error: &DocumentError) -> String {
    format!("Error loading Swagger documentation: {error}")
}

/// Declarations of the exposed tools, with their JSON Schema inputs.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": MAKE_REQUEST_TOOL,
            "description": "Make an API request based on the Swagger spec",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" },
                    "method": { "type": "string" },
                    "parameters": { "type": "object", "additionalProperties": {} },
                    "body": {}
                },
                "required": ["path", "method"],
                "additionalProperties": false
            }
        },
        {
            "name": LOAD_DOCUMENT_TOOL,
            "description": "Loads and returns the Swagger documentation",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }
    ])
}

/// Declaration of the documentation resource.
pub fn resource_definitions() -> Value {
    json!([
        {
            "uri": DOCUMENTATION_URI,
            "name": DOCUMENTATION_RESOURCE,
            "description": "Get the full Swagger documentation",
            "mimeType": "application/json"
        }
    ])
}
