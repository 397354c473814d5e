//! Document upload flow for the file-picker companion window.
//!
//! The file picker hands back platform-relative paths; this flow strips
//! their leading slash, posts the list to the configured upload endpoint
//! with the CSRF token, and asks the host to close the window shortly after
//! a successful upload. Any failure leaves the window open.

use crate::dispatch::Effect;

/// CSRF header expected by the upload endpoint.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Delay before the window closes after a successful upload.
pub const CLOSE_DELAY_MS: u64 = 100;

/// Selected paths as the upload endpoint wants them: leading slash removed.
pub fn upload_payload(selection: &[String]) -> Vec<String> {
    selection
        .iter()
        .map(|path| path.strip_prefix('/').unwrap_or(path).to_string())
        .collect()
}

/// POST the selection; a 200 reply yields the close-window effect.
pub async fn post_documents(
    client: &reqwest::Client,
    upload_url: &str,
    csrf_token: &str,
    selection: &[String],
) -> Option<Effect> {
    let payload = upload_payload(selection);
    let response = client
        .post(upload_url)
        .header("Accept", "application/json")
        .header(CSRF_HEADER, csrf_token)
        .json(&payload)
        .send()
        .await
        .ok()?;

    if response.status() != reqwest::StatusCode::OK {
        return None;
    }
    // The endpoint replies with a JSON body; it carries nothing we need,
    // but an unreadable body still counts as a failed upload.
    response.json::<serde_json::Value>().await.ok()?;

    Some(Effect::CloseWindow {
        delay_ms: CLOSE_DELAY_MS,
    })
}
