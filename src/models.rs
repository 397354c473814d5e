//! Request and reply types for the external HTTP contracts.
//!
//! Every JSON or form payload that crosses the process boundary is declared
//! here: the token-proxy request/reply pair, the collaboration platform's
//! sessiontoken reply, the remote form-validation contract, and the
//! code-availability reply.

use serde::{Deserialize, Serialize};

// ============================================================================
// Token Proxy
// ============================================================================

/// Normalized reply returned to token-proxy callers.
///
/// `nctoken` stays `None` (serialized as `null`) when the platform reply
/// carried no token, which callers already handle.
#[derive(Debug, Clone, Serialize)]
pub struct TokenReply {
    pub nctoken: Option<String>,
    pub nclocator: String,
    pub nclogin: String,
}

/// Reply from the collaboration platform's sessiontoken endpoint.
///
/// Only the fields the proxy reads; the platform sends more (login name,
/// device-token metadata) which is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformTokenReply {
    pub token: Option<String>,
    pub message: Option<String>,
}

// ============================================================================
// Remote Form Validation
// ============================================================================

/// Form payload sent to the remote validator.
///
/// Code fields are sent individually, matching the form's own field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationPayload {
    pub code1: String,
    pub code2: String,
    pub code3: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
    pub csrf_token: String,
}

/// Reply from the remote validator.
///
/// Each key is independently optional: an absent key means that check was
/// not evaluated and must not block submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "visioCode")]
    pub visio_code: Option<bool>,
    #[serde(rename = "captchaCode")]
    pub captcha_code: Option<bool>,
}

// ============================================================================
// Code Availability
// ============================================================================

/// Reply from the code-availability endpoint, used to prefill a code field.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableCodeReply {
    pub available_visio_code: String,
}
