use crate::AuthenticationError;

/// Errors raised while obtaining the interface document.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum DocumentError {
    /// The document server could not be reached, or the body could not be read.
    #[display("{_0}")]
    Unreachable(reqwest::Error),

    /// The document server answered with a non-success status.
    #[display("Failed to fetch Swagger spec: {status_text}")]
    FetchFailure {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase of the status.
        status_text: String,
    },

    /// The document body is not valid JSON.
    #[display("{_0}")]
    ParseFailure(serde_json::Error),
}

/// Errors raised by the request dispatch pipeline.
///
/// Each variant's `Display` is the message surfaced to the caller.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum DispatchError {
    /// The document could not be obtained.
    #[display("Error making request: {_0}")]
    Document(DocumentError),

    /// The requested path template is not declared in the document.
    #[display("Error: Path {path} not found in Swagger spec")]
    #[from(skip)]
    PathNotFound {
        /// The path as requested.
        path: String,
    },

    /// The path exists but does not declare the requested method.
    #[display("Error: Method {method} not supported for path {path}")]
    #[from(skip)]
    MethodNotSupported {
        /// The method as requested, uppercased.
        method: String,
        /// The path as requested.
        path: String,
    },

    /// Building, sending or decoding the outbound call failed.
    #[display("Error making request: {_0}")]
    RequestFailure(RequestFailure),
}

/// Failures of the outbound HTTP call itself.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum RequestFailure {
    /// The method is not a valid HTTP token.
    #[display("Invalid HTTP method '{method}'")]
    #[from(skip)]
    InvalidMethod {
        /// The rejected method.
        method: String,
        /// Why it was rejected.
        source: http::method::InvalidMethod,
    },

    /// The resolved target is not a valid URL.
    #[display("Invalid URL '{url}': {source}")]
    #[from(skip)]
    InvalidUrl {
        /// The URL after parameter substitution.
        url: String,
        /// Why it failed to parse.
        source: url::ParseError,
    },

    /// The credential cannot be sent as a header.
    Authentication(AuthenticationError),

    /// Network or protocol failure from reqwest.
    #[display("{_0}")]
    Http(reqwest::Error),

    /// The request body could not be serialized, or the response is not JSON.
    #[display("{_0}")]
    Json(serde_json::Error),
}
