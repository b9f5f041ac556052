use std::fmt;

use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur while turning a credential into a request header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },
}

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// The `Debug` output is fully redacted and the `Display` output is masked,
/// so a credential can be traced without leaking it into logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mask_sensitive(value: &str) -> String {
        if value.len() <= 8 || !value.is_ascii() {
            "***".to_string()
        } else {
            format!("{}...{}", &value[..4], &value[value.len() - 4..])
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Bearer credential attached to every dispatched request.
///
/// Adds an `Authorization: Bearer <token>` header (RFC 6750).
///
/// ```rust
/// use swagger_mcp_core::BearerAuth;
///
/// let auth = BearerAuth::new("my-api-token");
/// let (name, value) = auth.to_header()?;
/// assert_eq!(name, "authorization");
/// assert_eq!(value, "Bearer my-api-token");
/// # Ok::<(), swagger_mcp_core::AuthenticationError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth(SecureString);

impl BearerAuth {
    /// Wraps a raw token.
    pub fn new(token: impl Into<SecureString>) -> Self {
        Self(token.into())
    }

    /// Converts the credential into an HTTP header pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError::InvalidBearerToken` if the token contains
    /// characters that are not allowed in a header value.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        let header_value = format!("Bearer {}", self.0.as_str());
        let mut value = HeaderValue::from_str(&header_value).map_err(|err| {
            AuthenticationError::InvalidBearerToken {
                message: err.to_string(),
            }
        })?;
        value.set_sensitive(true);
        Ok((AUTHORIZATION, value))
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerAuth").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let auth = BearerAuth::new("my-secret-token");
        let (header_name, header_value) = auth.to_header().expect("valid token");

        assert_eq!(header_name, AUTHORIZATION);
        assert_eq!(header_value, "Bearer my-secret-token");
        assert!(header_value.is_sensitive());
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        let auth = BearerAuth::new("\0invalid");

        let result = auth.to_header();

        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidBearerToken { .. })
        ));
    }

    #[test]
    fn test_display_masks_secrets() {
        let auth = BearerAuth::new("very-secret-token-12345");
        assert_eq!(auth.to_string(), "Bearer very...2345");
        assert_eq!(format!("{auth:?}"), "BearerAuth(\"[REDACTED]\")");
    }

    #[test]
    fn test_secure_string_mask_short_tokens() {
        assert_eq!(SecureString::mask_sensitive("short"), "***");
        assert_eq!(SecureString::mask_sensitive("12345678"), "***");
        assert_eq!(SecureString::mask_sensitive("123456789"), "1234...6789");
        assert_eq!(SecureString::mask_sensitive("ééééééééé"), "***");
    }

    #[test]
    fn test_secure_string_debug() {
        let secure = SecureString::new("secret-password".to_string());
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString { value: \"[REDACTED]\" }");
        assert!(!debug_str.contains("secret-password"));
    }
}
