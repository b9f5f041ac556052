use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::Config;
use crate::document::{InterfaceDocument, ServerUrl};

/// Regular expression for matching path placeholders in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>[^{}/]+)}").expect("a valid regex"));

/// Origin the operation paths are appended to.
///
/// The first declared server wins; a relative server url is resolved against
/// the document location. Without a declared server the document origin is used.
pub(super) fn base_origin(config: &Config, document: &InterfaceDocument) -> String {
    match document.first_server_url() {
        ServerUrl::Declared(server) => match url::Url::parse(server) {
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                match config.document_url().join(server) {
                    Ok(resolved) => resolved.as_str().trim_end_matches('/').to_string(),
                    Err(error) => {
                        debug!(?server, %error, "cannot resolve relative server url");
                        server.to_string()
                    }
                }
            }
            _ => server.to_string(),
        },
        ServerUrl::Undeclared => config.document_origin(),
    }
}

/// Appends the path template to the origin and substitutes parameters.
///
/// Each parameter replaces the first `{name}` occurrence only; placeholders
/// without a parameter stay in the URL.
pub(super) fn target_url(origin: &str, path: &str, parameters: &IndexMap<String, Value>) -> String {
    let mut url = [origin, path].concat();
    for (name, value) in parameters {
        url = replace_path_param(&url, name, &param_to_string(value));
    }
    url
}

/// Placeholder names still present in `url`.
pub(super) fn unresolved_placeholders(url: &str) -> Vec<&str> {
    RE.captures_iter(url)
        .filter_map(|caps| caps.name("name"))
        .map(|found| found.as_str())
        .collect()
}

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replacen(&pattern, value, 1)
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
