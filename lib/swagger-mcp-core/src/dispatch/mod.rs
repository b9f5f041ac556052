//! Request dispatch: resolve an operation from the document and call it.

use std::sync::Arc;

use headers::{ContentType, HeaderMapExt};
use http::Method;
use indexmap::IndexMap;
use reqwest::{Body, Request};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::document::{DocumentCache, OperationLookup};
use crate::{Config, DispatchError, RequestFailure};

mod path;

/// A caller's request against a declared operation.
///
/// ```rust
/// use swagger_mcp_core::RequestDescriptor;
/// use serde_json::json;
///
/// let request = RequestDescriptor::new("/pets/{petId}", "get").with_param("petId", 42);
/// assert_eq!(request.parameters["petId"], json!(42));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDescriptor {
    /// The path template, exactly as declared in the document.
    pub path: String,
    /// The HTTP method, case-insensitive.
    pub method: String,
    /// Values for the `{name}` placeholders of the path.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    /// JSON request body, not sent when absent or `null`.
    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// A request without parameters nor body.
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            parameters: IndexMap::new(),
            body: None,
        }
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Turns request descriptors into HTTP calls against the documented API.
///
/// The dispatcher is cheap to clone; clones share the HTTP client and the
/// document cache.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: Arc<Config>,
    cache: Arc<DocumentCache>,
}

impl Dispatcher {
    /// Creates a dispatcher with its own HTTP client and an empty document cache.
    pub fn new(config: Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a dispatcher using the provided HTTP client.
    pub fn with_client(client: reqwest::Client, config: Config) -> Self {
        let cache = DocumentCache::new(client.clone(), config.document_url().clone());
        Self {
            client,
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }

    /// The shared document cache.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// The process configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Executes one request and returns the parsed JSON response.
    ///
    /// The response body is decoded as JSON whatever its status code.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Document`] if the document cannot be obtained
    /// - [`DispatchError::PathNotFound`] / [`DispatchError::MethodNotSupported`]
    ///   if the operation is not declared, no call is made in these cases
    /// - [`DispatchError::RequestFailure`] if the call fails or the response is not JSON
    pub async fn dispatch(&self, request: &RequestDescriptor) -> Result<Value, DispatchError> {
        let document = self.cache.get().await?;

        let method = request.method.to_uppercase();
        match document.operation(&request.path, &method.to_lowercase()) {
            Ok(_) => {}
            Err(OperationLookup::MissingPath) => {
                return Err(DispatchError::PathNotFound {
                    path: request.path.clone(),
                });
            }
            Err(OperationLookup::MissingMethod) => {
                return Err(DispatchError::MethodNotSupported {
                    method,
                    path: request.path.clone(),
                });
            }
        }

        let origin = path::base_origin(&self.config, &document);
        let url = path::target_url(&origin, &request.path, &request.parameters);
        let unresolved = path::unresolved_placeholders(&url);
        if !unresolved.is_empty() {
            warn!(%url, ?unresolved, "path placeholders left unresolved");
        }

        let http_request = self.build_request(&method, &url, request.body.as_ref())?;
        let response = self.execute(http_request).await?;
        Ok(response)
    }

    fn build_request(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Request, RequestFailure> {
        let method =
            Method::from_bytes(method.as_bytes()).map_err(|source| RequestFailure::InvalidMethod {
                method: method.to_string(),
                source,
            })?;
        let url = Url::parse(url).map_err(|source| RequestFailure::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut request = Request::new(method, url);
        let req_headers = request.headers_mut();
        req_headers.typed_insert(ContentType::json());

        if let Some(auth) = self.config.credential() {
            let (header_name, header_value) = auth.to_header()?;
            req_headers.insert(header_name, header_value);
        }

        if let Some(body) = body.filter(|it| !it.is_null()) {
            let data = serde_json::to_vec(body)?;
            *request.body_mut() = Some(Body::from(data));
        }

        Ok(request)
    }

    async fn execute(&self, request: Request) -> Result<Value, RequestFailure> {
        debug!(?request, "sending...");
        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "remote API answered with a non-success status");
        }

        let text = response.text().await?;
        let value = serde_json::from_str(&text)?;
        Ok(value)
    }
}
