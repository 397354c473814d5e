//! Validation for operator-configured upstream URLs.
//!
//! The proxy and the page clients only ever talk to endpoints the operator
//! configured (collaboration platform base, validation endpoint, upload
//! endpoint). A typo there would surface as confusing runtime failures, so
//! every configured URL is checked once at startup: well-formed, http(s),
//! a real host, and no credentials smuggled into the URL.

use url::Url;

/// Why a configured URL was rejected.
#[derive(Debug, Clone)]
pub enum UrlValidationError {
    /// URL is malformed or cannot be parsed
    InvalidUrl(String),
    /// URL uses a scheme other than http or https
    UnsupportedScheme(String),
    /// URL has no host
    MissingHost,
    /// URL embeds a username or password
    CredentialsNotAllowed,
    /// Base URLs may not carry a query string or fragment
    UnexpectedQueryOrFragment,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlValidationError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            UrlValidationError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported scheme: {}", scheme)
            }
            UrlValidationError::MissingHost => write!(f, "URL has no host"),
            UrlValidationError::CredentialsNotAllowed => {
                write!(f, "Credentials in URLs are not allowed")
            }
            UrlValidationError::UnexpectedQueryOrFragment => {
                write!(f, "Base URLs may not carry a query or fragment")
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// Shared checks for any configured endpoint URL.
fn validate_common(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str).map_err(|e| UrlValidationError::InvalidUrl(e.to_string()))?;

    // Internal deployments commonly speak plain http, so both are accepted.
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(UrlValidationError::UnsupportedScheme(
            url.scheme().to_string(),
        ));
    }

    if url.host_str().map_or(true, |h| h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::CredentialsNotAllowed);
    }

    Ok(url)
}

/// Validate a base URL that endpoint paths get appended to, such as the
/// collaboration platform host.
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = validate_common(url_str)?;
    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedQueryOrFragment);
    }
    Ok(url)
}

/// Validate a complete endpoint URL, where a query string is legitimate.
pub fn validate_endpoint_url(url_str: &str) -> Result<Url, UrlValidationError> {
    validate_common(url_str)
}
