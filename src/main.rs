//! joindesk server: session-token proxy for the collaboration platform.
//!
//! One route: `POST /` exchanges a username for a platform session token,
//! guarded by a shared-secret header. Everything else in the crate is
//! library code consumed by the front-end build.

use axum::{routing::post, Router};
use std::sync::Arc;

use joindesk::{token_proxy, AppState, Config, BIND_ADDR};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Bad configuration: {}", message);
            std::process::exit(1);
        }
    };
    let platform = config.platform_base_url.clone();
    let state = Arc::new(AppState::new(config));

    let app = Router::new()
        .route("/", post(token_proxy::issue_token))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(BIND_ADDR)
        .await
        .expect("Failed to bind to port 9000");

    println!("Token proxy running at http://{}", BIND_ADDR);
    println!("Collaboration platform: {}", platform);

    axum::serve(listener, app).await.expect("Server error");
}
