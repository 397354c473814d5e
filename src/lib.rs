//! joindesk: integration layer for a video-conferencing web front-end.
//!
//! The crate has two halves. The server half is a single axum endpoint that
//! proxies session-token requests to the collaboration platform. The client
//! half models the join page's interactive pieces as explicit widgets driven
//! by an event loop:
//!
//! - `code_input`: the segmented 9-digit meeting-code input
//! - `dispatch`: event queue, handler registration, presentation effects
//! - `validation`: remote form-validation client
//! - `token_proxy`: the session-token proxy endpoint
//! - `page_controls`: name preview, copy feedback, password generation,
//!   code prefill
//! - `upload`: document-upload flow for the file-picker window
//! - `url_validator`: startup checks for configured upstream URLs
//! - `models`: request/reply types for the external contracts

use std::env;
use std::fs;
use std::time::Duration;

pub mod code_input;
pub mod dispatch;
pub mod models;
pub mod page_controls;
pub mod token_proxy;
pub mod upload;
pub mod url_validator;
pub mod validation;

// ============================================================================
// Configuration
// ============================================================================

/// Default location of the platform sessiontoken key.
pub const SESSIONTOKEN_KEY_FILE: &str = "conf/key.txt";

/// Address the token proxy listens on.
pub const BIND_ADDR: &str = "0.0.0.0:9000";

/// Timeout for calls to the collaboration platform.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret callers must present in the `X-API-KEY` header.
    pub api_key: String,
    /// Base URL of the collaboration platform.
    pub platform_base_url: String,
    /// Key authenticating this service against the platform's sessiontoken
    /// API, kept in a file rather than the environment.
    pub sessiontoken_key: String,
}

impl Config {
    /// Load from the environment: `NC_LOGIN_API_KEY`, `NC_HOST`, and
    /// optionally `SESSIONTOKEN_KEY_FILE` to relocate the key file.
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("NC_LOGIN_API_KEY")
            .map_err(|_| "NC_LOGIN_API_KEY environment variable is required".to_string())?;

        let platform_base_url =
            env::var("NC_HOST").map_err(|_| "NC_HOST environment variable is required".to_string())?;
        url_validator::validate_base_url(&platform_base_url)
            .map_err(|e| format!("NC_HOST is not usable: {}", e))?;

        let key_path =
            env::var("SESSIONTOKEN_KEY_FILE").unwrap_or_else(|_| SESSIONTOKEN_KEY_FILE.to_string());
        let sessiontoken_key = fs::read_to_string(&key_path)
            .map_err(|e| format!("Key file not found: {}: {}", key_path, e))?
            .trim()
            .to_string();
        if sessiontoken_key.is_empty() {
            return Err(format!("Key file is empty: {}", key_path));
        }

        Ok(Self {
            api_key,
            platform_base_url,
            sessiontoken_key,
        })
    }
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self { config, http }
    }
}

// Re-export commonly used types
pub use code_input::{
    CaptchaField, CodeField, CodeInputForm, FieldStatus, SubmitMode, CAPTCHA_ERROR_MESSAGE,
    CODE_ERROR_MESSAGE, CODE_LENGTH, FIELD_COUNT, FIELD_WIDTH,
};

pub use dispatch::{Caret, Dispatcher, Effect, EventHandler, FieldSlot, Key, MessageSlot, UiEvent};

pub use models::{
    AvailableCodeReply, PlatformTokenReply, TokenReply, ValidationPayload, ValidationReport,
};

pub use page_controls::{
    fetch_available_code, generate_password, name_preview, CopyControl, CopyIndicator,
    COPY_FEEDBACK_MILLIS,
};

pub use token_proxy::{issue_token, API_KEY_HEADER, DENIED_BODY, SERVICE_NAME};

pub use upload::{post_documents, upload_payload, CLOSE_DELAY_MS, CSRF_HEADER};

pub use url_validator::{validate_base_url, validate_endpoint_url, UrlValidationError};

pub use validation::{request_validation, submit_with_validation};
