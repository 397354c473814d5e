//! Client for the remote form-validation endpoint.
//!
//! The validator authoritatively checks the meeting code and, when present,
//! the captcha. Its reply carries independent optional booleans; anything
//! else (transport failure, non-2xx status, unparseable body) collapses to
//! `None`, which the widget treats as a failed submission attempt with no
//! retry.

use crate::code_input::CodeInputForm;
use crate::dispatch::{Effect, UiEvent};
use crate::models::{ValidationPayload, ValidationReport};

/// POST the form contents to the validator and read its report.
pub async fn request_validation(
    client: &reqwest::Client,
    validation_url: &str,
    payload: &ValidationPayload,
) -> Option<ValidationReport> {
    let response = match client.post(validation_url).form(payload).send().await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("form validation request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        log::warn!("form validation replied {}", response.status());
        return None;
    }

    match response.json::<ValidationReport>().await {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("unusable form validation reply: {}", e);
            None
        }
    }
}

/// Drive one submission attempt end to end.
///
/// Feeds `SubmitRequested` to the widget; when the widget asks for remote
/// validation, performs the single call and feeds the completion back in.
/// The returned effects are everything the host must apply, with the
/// already-performed `RequestValidation` removed.
pub async fn submit_with_validation(
    form: &mut CodeInputForm,
    client: &reqwest::Client,
    validation_url: &str,
) -> Vec<Effect> {
    let mut effects = form.handle_event(&UiEvent::SubmitRequested);

    let requested = effects
        .iter()
        .position(|e| matches!(e, Effect::RequestValidation(_)));
    if let Some(index) = requested {
        if let Effect::RequestValidation(payload) = effects.remove(index) {
            let report = request_validation(client, validation_url, &payload).await;
            effects.extend(form.handle_event(&UiEvent::ValidationCompleted(report)));
        }
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_parses_both_keys() {
        let report: ValidationReport =
            serde_json::from_str(r#"{"visioCode": false, "captchaCode": true}"#).unwrap();
        assert_eq!(report.visio_code, Some(false));
        assert_eq!(report.captcha_code, Some(true));
    }

    #[test]
    fn test_report_keys_are_independently_optional() {
        let report: ValidationReport = serde_json::from_str(r#"{"visioCode": true}"#).unwrap();
        assert_eq!(report.visio_code, Some(true));
        assert_eq!(report.captcha_code, None);

        let report: ValidationReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn test_report_ignores_unknown_keys() {
        let report: ValidationReport =
            serde_json::from_str(r#"{"visioCode": true, "other": 3}"#).unwrap();
        assert_eq!(report.visio_code, Some(true));
    }

    #[test]
    fn test_payload_omits_absent_captcha() {
        let payload = ValidationPayload {
            code1: "123".to_string(),
            code2: "456".to_string(),
            code3: "789".to_string(),
            captcha: None,
            csrf_token: "tok".to_string(),
        };
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(encoded["code1"], "123");
        assert_eq!(encoded["csrf_token"], "tok");
        assert!(encoded.get("captcha").is_none());
    }
}
