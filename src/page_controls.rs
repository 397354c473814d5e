//! Controllers for the host page's small interactive pieces.
//!
//! Each of these used to be a standalone page script: the live name preview
//! on the join form, the clipboard-copy confirmation on share buttons, the
//! throwaway password generator, and the meeting-code prefill button.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::AvailableCodeReply;

// ============================================================================
// Name Preview
// ============================================================================

/// The attendee name shown in the preview area: the full name, with the
/// suffix appended after a dash when one is set.
pub fn name_preview(fullname: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        fullname.to_string()
    } else {
        format!("{} - {}", fullname, suffix)
    }
}

// ============================================================================
// Clipboard Copy Feedback
// ============================================================================

/// How long the copy control shows its confirmation state.
pub const COPY_FEEDBACK_MILLIS: i64 = 2000;

/// Icon shown on a copy control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIndicator {
    Clipboard,
    Success,
}

/// A share button that confirms a clipboard copy, then reverts on its own.
#[derive(Debug)]
pub struct CopyControl {
    indicator: CopyIndicator,
    reverts_at: Option<DateTime<Utc>>,
}

impl CopyControl {
    pub fn new() -> Self {
        Self {
            indicator: CopyIndicator::Clipboard,
            reverts_at: None,
        }
    }

    pub fn indicator(&self) -> CopyIndicator {
        self.indicator
    }

    /// The control was pressed: switch to the confirmation presentation and
    /// schedule the revert. The host performs the actual clipboard write.
    pub fn press(&mut self, now: DateTime<Utc>) {
        self.indicator = CopyIndicator::Success;
        self.reverts_at = Some(now + Duration::milliseconds(COPY_FEEDBACK_MILLIS));
    }

    /// Revert to the idle presentation once the deadline has passed.
    /// Returns true when a revert happened on this tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.reverts_at {
            Some(deadline) if now >= deadline => {
                self.indicator = CopyIndicator::Clipboard;
                self.reverts_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for CopyControl {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Password Generation
// ============================================================================

/// Random alphanumeric password for ad-hoc meeting access.
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

// ============================================================================
// Meeting-Code Prefill
// ============================================================================

/// Fetch an available meeting code to prefill the creation form. Any
/// failure leaves the field untouched.
pub async fn fetch_available_code(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let reply = response.json::<AvailableCodeReply>().await.ok()?;
    Some(reply.available_visio_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_preview_without_suffix() {
        assert_eq!(name_preview("Marie Curie", ""), "Marie Curie");
    }

    #[test]
    fn test_name_preview_with_suffix() {
        assert_eq!(
            name_preview("Marie Curie", "Académie"),
            "Marie Curie - Académie"
        );
    }

    #[test]
    fn test_copy_control_reverts_after_deadline() {
        let start = Utc::now();
        let mut control = CopyControl::new();
        assert_eq!(control.indicator(), CopyIndicator::Clipboard);

        control.press(start);
        assert_eq!(control.indicator(), CopyIndicator::Success);

        // Not yet.
        assert!(!control.tick(start + Duration::milliseconds(COPY_FEEDBACK_MILLIS - 1)));
        assert_eq!(control.indicator(), CopyIndicator::Success);

        assert!(control.tick(start + Duration::milliseconds(COPY_FEEDBACK_MILLIS)));
        assert_eq!(control.indicator(), CopyIndicator::Clipboard);
        // Idle ticks do nothing.
        assert!(!control.tick(start + Duration::milliseconds(COPY_FEEDBACK_MILLIS + 1)));
    }

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password(12);
        assert_eq!(password.len(), 12);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(generate_password(0).is_empty());
    }

    #[test]
    fn test_available_code_reply_parses() {
        let reply: AvailableCodeReply =
            serde_json::from_str(r#"{"available_visio_code": "123456789"}"#).unwrap();
        assert_eq!(reply.available_visio_code, "123456789");
    }
}
