//! Interface document: the fetched Swagger/OpenAPI description and its cache.

use serde_json::Value;

mod cache;
pub use self::cache::DocumentCache;

/// Where the target API lives according to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerUrl<'a> {
    /// No usable `servers[0].url`.
    Undeclared,
    /// The first declared server url, as written in the document.
    Declared(&'a str),
}

/// Why an operation could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationLookup {
    /// The path template is not declared.
    MissingPath,
    /// The path is declared but not with this method.
    MissingMethod,
}

/// Read-only view over a fetched interface document.
///
/// The document is kept as a raw JSON value; only the accessors needed to
/// resolve an operation are exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDocument {
    raw: Value,
}

impl InterfaceDocument {
    /// Wraps an already parsed document.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The document as fetched.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Finds the operation declared under `paths[path][method]`.
    ///
    /// `path` must match the declared template exactly, and `method` is
    /// expected in lowercase like the document keys.
    ///
    /// # Errors
    ///
    /// Tells whether the path or the method is missing.
    pub fn operation(&self, path: &str, method: &str) -> Result<&Value, OperationLookup> {
        let path_item = self
            .raw
            .get("paths")
            .and_then(|paths| paths.get(path))
            .filter(|item| is_present(item))
            .ok_or(OperationLookup::MissingPath)?;

        path_item
            .get(method)
            .filter(|operation| is_present(operation))
            .ok_or(OperationLookup::MissingMethod)
    }

    /// The `url` of the first entry of `servers`, when it is a non-empty string.
    pub fn first_server_url(&self) -> ServerUrl<'_> {
        self.raw
            .get("servers")
            .and_then(|servers| servers.get(0))
            .and_then(|server| server.get("url"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map_or(ServerUrl::Undeclared, ServerUrl::Declared)
    }

    /// The document pretty printed with two-space indentation.
    ///
    /// # Errors
    ///
    /// Only fails if the value cannot be serialized, which does not happen for
    /// values produced by the JSON parser.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.raw)
    }
}

// `null`, `false`, `0` and `""` entries do not declare anything
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|it| it != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Value> for InterfaceDocument {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}
