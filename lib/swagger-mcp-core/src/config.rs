use url::Url;

use crate::BearerAuth;

/// Errors raised while validating the process configuration.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ConfigError {
    /// The document location is not an absolute URL.
    #[display("Invalid Swagger URL '{url}': {source}")]
    InvalidDocumentUrl {
        /// The rejected input.
        url: String,
        /// Why it failed to parse.
        source: url::ParseError,
    },

    /// The document location uses a scheme that cannot be fetched over HTTP.
    #[display("Unsupported scheme '{scheme}' for Swagger URL, expected http or https")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },
}

/// Immutable process configuration.
///
/// ```rust
/// use swagger_mcp_core::Config;
///
/// let config = Config::new("https://petstore3.swagger.io/api/v3/openapi.json", None)?;
/// assert_eq!(config.document_origin(), "https://petstore3.swagger.io");
/// assert!(config.credential().is_none());
/// # Ok::<(), swagger_mcp_core::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    document_url: Url,
    credential: Option<BearerAuth>,
}

impl Config {
    /// Validates the document location and wraps the optional credential.
    ///
    /// An empty credential is treated as no credential.
    ///
    /// # Errors
    ///
    /// Fails if `document_url` is not an absolute `http`/`https` URL.
    pub fn new(document_url: &str, credential: Option<String>) -> Result<Self, ConfigError> {
        let url = Url::parse(document_url).map_err(|source| ConfigError::InvalidDocumentUrl {
            url: document_url.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }

        let credential = credential
            .filter(|token| !token.is_empty())
            .map(BearerAuth::new);

        Ok(Self {
            document_url: url,
            credential,
        })
    }

    /// Location of the interface document.
    pub fn document_url(&self) -> &Url {
        &self.document_url
    }

    /// `scheme://host[:port]` of the document location, default ports omitted.
    pub fn document_origin(&self) -> String {
        self.document_url.origin().ascii_serialization()
    }

    /// The configured bearer credential, if any.
    pub fn credential(&self) -> Option<&BearerAuth> {
        self.credential.as_ref()
    }
}
