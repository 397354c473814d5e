//! Token proxy endpoint.
//!
//! The front-end cannot talk to the collaboration platform's sessiontoken
//! API directly, so this endpoint takes a username, authenticates the caller
//! with a shared secret header, asks the platform for a session token on the
//! user's behalf, and hands back a normalized reply. Upstream failures are
//! passed through without reinterpretation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::models::{PlatformTokenReply, TokenReply};
use crate::AppState;

/// Header carrying the caller's shared secret.
pub const API_KEY_HEADER: &str = "X-API-KEY";
/// Fixed body returned to unauthenticated callers.
pub const DENIED_BODY: &str = "Denied";
/// Device name registered with the platform for issued tokens.
pub const SERVICE_NAME: &str = "joindesk";

// ============================================================================
// Handler
// ============================================================================

/// `POST /`: exchange a username for a platform session token.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !api_key_matches(presented, &state.config.api_key) {
        return (StatusCode::FORBIDDEN, DENIED_BODY).into_response();
    }

    let Ok(Json(data)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid JSON payload"})),
        )
            .into_response();
    };
    let Some(username) = data.get("username").and_then(|u| u.as_str()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing username in request"})),
        )
            .into_response();
    };

    let endpoint = sessiontoken_endpoint(&state.config.platform_base_url);
    let payload = [
        ("apikey", state.config.sessiontoken_key.as_str()),
        ("name", SERVICE_NAME),
        ("user", username),
    ];

    let response = match state.http.post(&endpoint).form(&payload).send().await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to connect to collaboration platform: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to connect to collaboration platform"})),
            )
                .into_response();
        }
    };

    let upstream_status = response.status();
    let reply: PlatformTokenReply = match response.json().await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Invalid response from collaboration platform: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Invalid response from collaboration platform"})),
            )
                .into_response();
        }
    };

    if !upstream_status.is_success() {
        log::error!(
            "Invalid response from collaboration platform: {}",
            reply.message.as_deref().unwrap_or("no message")
        );
        let status = StatusCode::from_u16(upstream_status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            Json(json!({"error": "Invalid response from collaboration platform"})),
        )
            .into_response();
    }

    Json(normalize_reply(
        reply,
        &state.config.platform_base_url,
        username,
    ))
    .into_response()
}

// ============================================================================
// Helpers
// ============================================================================

/// Constant-time shared-secret comparison; an empty presented key never
/// matches.
fn api_key_matches(presented: &str, expected: &str) -> bool {
    if presented.is_empty() || presented.len() != expected.len() {
        return false;
    }
    presented.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() == 1
}

/// The platform's sessiontoken endpoint for a configured base URL.
fn sessiontoken_endpoint(base_url: &str) -> String {
    format!(
        "{}/apps/sessiontoken/token",
        base_url.trim_end_matches('/')
    )
}

/// Flatten the platform reply into what front-end callers consume.
fn normalize_reply(reply: PlatformTokenReply, base_url: &str, username: &str) -> TokenReply {
    TokenReply {
        nctoken: reply.token,
        nclocator: base_url.to_string(),
        nclogin: username.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_comparison() {
        assert!(api_key_matches("secret", "secret"));
        assert!(!api_key_matches("secrex", "secret"));
        assert!(!api_key_matches("secre", "secret"));
        assert!(!api_key_matches("", "secret"));
    }

    #[test]
    fn test_sessiontoken_endpoint_handles_trailing_slash() {
        assert_eq!(
            sessiontoken_endpoint("https://cloud.example.org"),
            "https://cloud.example.org/apps/sessiontoken/token"
        );
        assert_eq!(
            sessiontoken_endpoint("https://cloud.example.org/"),
            "https://cloud.example.org/apps/sessiontoken/token"
        );
    }

    #[test]
    fn test_normalize_reply_keeps_missing_token_null() {
        let reply: PlatformTokenReply = serde_json::from_str(
            r#"{"token": "aaa-bbb", "loginName": "marie", "deviceToken": {"id": 3}}"#,
        )
        .unwrap();
        let normalized = normalize_reply(reply, "https://cloud.example.org", "marie");
        assert_eq!(normalized.nctoken.as_deref(), Some("aaa-bbb"));
        assert_eq!(normalized.nclocator, "https://cloud.example.org");
        assert_eq!(normalized.nclogin, "marie");

        let reply: PlatformTokenReply = serde_json::from_str(r#"{"message": "nope"}"#).unwrap();
        let normalized = normalize_reply(reply, "https://cloud.example.org", "marie");
        assert!(normalized.nctoken.is_none());
        let body = serde_json::to_value(&normalized).unwrap();
        assert!(body["nctoken"].is_null());
    }
}
