//! # Swagger MCP Core
//!
//! Expose an HTTP API described by a Swagger/OpenAPI document as
//! [Model Context Protocol](https://modelcontextprotocol.io) tools.
//!
//! The document is fetched once, on first use, and cached for the life of the
//! process. Callers can then:
//! - read the whole document (`loadSwaggerDoc` tool, `swagger://documentation` resource)
//! - call any declared operation by path template and method (`makeRequest` tool)
//!
//! ## Dispatching a request
//!
//! ```rust,no_run
//! use swagger_mcp_core::{Config, Dispatcher, RequestDescriptor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("https://petstore3.swagger.io/api/v3/openapi.json", None)?;
//! let dispatcher = Dispatcher::new(config);
//!
//! let request = RequestDescriptor::new("/pet/{petId}", "get").with_param("petId", 10);
//! let pet = dispatcher.dispatch(&request).await?;
//! println!("{pet:#}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving over stdio
//!
//! ```rust,no_run
//! use swagger_mcp_core::{Config, Dispatcher, McpServer, SwaggerTools};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("http://localhost:8080/openapi.json", Some("token".to_string()))?;
//! let server = McpServer::new(SwaggerTools::new(Dispatcher::new(config)));
//! server.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Resolution rules
//!
//! - the path must match a key of `paths` exactly, the method is matched lowercased
//! - the target origin is `servers[0].url` when declared, otherwise the origin of the document URL
//! - each parameter replaces the first `{name}` placeholder of the path
//! - `Content-Type: application/json` is always sent, `Authorization: Bearer <token>` when configured
//! - the response is decoded as JSON whatever its status

mod auth;
pub use self::auth::{AuthenticationError, BearerAuth, SecureString};

mod config;
pub use self::config::{Config, ConfigError};

pub mod document;
pub use self::document::{DocumentCache, InterfaceDocument};

mod dispatch;
pub use self::dispatch::{Dispatcher, RequestDescriptor};

mod error;
pub use self::error::{DispatchError, DocumentError, RequestFailure};

pub mod tools;
pub use self::tools::{ResourceContents, SwaggerTools, ToolOutput};

pub mod server;
pub use self::server::McpServer;
