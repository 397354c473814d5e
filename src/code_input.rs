//! Segmented meeting-code input widget.
//!
//! A meeting is joined with a 9-digit code typed into three 3-digit fields.
//! [`CodeInputForm`] owns the fields, the optional captcha companion, the
//! focus index and the submission gate, and reacts to [`UiEvent`]s with
//! [`Effect`]s: per-field visual status, auto-advance/retreat of focus,
//! paste distribution, and the submit flow, either direct or gated on a
//! remote validation round-trip, chosen at construction.

use crate::dispatch::{Caret, Effect, EventHandler, FieldSlot, Key, MessageSlot, UiEvent};
use crate::models::{ValidationPayload, ValidationReport};

#[cfg(test)]
#[path = "code_input_test.rs"]
mod code_input_test;

/// Number of code fields on the form.
pub const FIELD_COUNT: usize = 3;
/// Digits held by one field.
pub const FIELD_WIDTH: usize = 3;
/// Length of a complete meeting code.
pub const CODE_LENGTH: usize = FIELD_COUNT * FIELD_WIDTH;

/// Inline message shown when the remote validator rejects the code.
pub const CODE_ERROR_MESSAGE: &str = "Code de connexion incorrect";
/// Inline message shown when the remote validator rejects the captcha.
pub const CAPTCHA_ERROR_MESSAGE: &str = "Code de sécurité incorrect";

// ============================================================================
// Field State
// ============================================================================

/// Presentation-only classification of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Neutral,
    Valid,
    Error,
}

/// One 3-digit segment of the meeting code.
#[derive(Debug, Clone, Default)]
pub struct CodeField {
    content: String,
    status: FieldStatus,
    /// Error imposed by a remote validation failure. Outlives local edits
    /// until the field is emptied or its content replaced by a paste.
    remote_error: bool,
}

impl CodeField {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    /// Insert a digit at `offset`. Non-digits and overflow are dropped.
    fn insert(&mut self, ch: char, offset: usize) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        if self.content.len() >= FIELD_WIDTH {
            return false;
        }
        if offset > self.content.len() {
            return false;
        }
        self.content.insert(offset, ch);
        true
    }

    /// Delete the character before `offset`.
    fn backspace(&mut self, offset: usize) -> bool {
        if offset == 0 || offset > self.content.len() {
            return false;
        }
        self.content.remove(offset - 1);
        true
    }

    /// Replace content wholesale, as the paste distributor does. Counts as
    /// fresh input: any remotely imposed error is discarded.
    fn set_content(&mut self, digits: &str) {
        self.content = digits
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(FIELD_WIDTH)
            .collect();
        self.remote_error = false;
    }

    /// Recompute the visual status from content.
    ///
    /// Empty content resets to neutral and clears a remote error; otherwise
    /// a remote error wins until then; otherwise exactly 3 digits is valid
    /// and anything shorter is an error.
    fn refresh_status(&mut self) {
        if self.content.is_empty() {
            self.remote_error = false;
            self.status = FieldStatus::Neutral;
        } else if self.remote_error {
            self.status = FieldStatus::Error;
        } else if self.content.len() == FIELD_WIDTH {
            self.status = FieldStatus::Valid;
        } else {
            self.status = FieldStatus::Error;
        }
    }
}

/// The optional captcha companion field.
///
/// Unlike the code fields it has no local notion of a well-formed value:
/// only the remote validator ever marks it valid or invalid.
#[derive(Debug, Clone, Default)]
pub struct CaptchaField {
    content: String,
    status: FieldStatus,
    server_outcome: Option<bool>,
}

impl CaptchaField {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        if self.content.is_empty() {
            self.server_outcome = None;
        }
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        self.status = if self.content.is_empty() {
            FieldStatus::Neutral
        } else {
            match self.server_outcome {
                Some(true) => FieldStatus::Valid,
                Some(false) => FieldStatus::Error,
                None => FieldStatus::Neutral,
            }
        };
    }
}

// ============================================================================
// Widget
// ============================================================================

/// How a completed form leaves the page, fixed per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    /// Submit directly whenever the gate holds.
    Direct,
    /// Ask the remote validator first; submit only on a fully positive
    /// report. The CSRF token travels with the validation payload.
    RemoteValidated { csrf_token: String },
}

/// The code-input widget: three code fields, an optional captcha companion,
/// focus, and the submission gate. One instance per form mount.
#[derive(Debug)]
pub struct CodeInputForm {
    fields: [CodeField; FIELD_COUNT],
    captcha: Option<CaptchaField>,
    focus: usize,
    mode: SubmitMode,
    submit_enabled: bool,
    validation_pending: bool,
}

impl CodeInputForm {
    pub fn new(mode: SubmitMode) -> Self {
        Self {
            fields: Default::default(),
            captcha: None,
            focus: 0,
            mode,
            submit_enabled: false,
            validation_pending: false,
        }
    }

    /// Attach the captcha companion. Its non-empty content becomes the
    /// second conjunct of the submission gate.
    pub fn with_captcha(mut self) -> Self {
        self.captcha = Some(CaptchaField::default());
        self
    }

    pub fn field(&self, index: usize) -> &CodeField {
        &self.fields[index]
    }

    pub fn captcha(&self) -> Option<&CaptchaField> {
        self.captcha.as_ref()
    }

    /// Index of the field currently holding focus. Exactly one field holds
    /// focus at any time.
    pub fn focused_field(&self) -> usize {
        self.focus
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn validation_pending(&self) -> bool {
        self.validation_pending
    }

    /// The code as entered so far: field contents concatenated in position
    /// order, regardless of edit order.
    pub fn code_value(&self) -> String {
        self.fields.iter().map(|f| f.content.as_str()).collect()
    }

    /// True when the code is exactly 9 digits.
    pub fn code_is_complete(&self) -> bool {
        let code = self.code_value();
        code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
    }

    /// The submission gate: complete code, and a non-empty captcha when the
    /// companion is attached.
    pub fn form_is_complete(&self) -> bool {
        let captcha_ok = match &self.captcha {
            Some(captcha) => !captcha.content.is_empty(),
            None => true,
        };
        self.code_is_complete() && captcha_ok
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// React to one event, returning the presentation effects in order.
    pub fn handle_event(&mut self, event: &UiEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            UiEvent::Key { field, key, caret } => {
                self.on_key(*field, *key, *caret, &mut effects)
            }
            UiEvent::Paste { text } => self.on_paste(text, &mut effects),
            UiEvent::CaptchaInput { content } => self.on_captcha_input(content, &mut effects),
            UiEvent::SubmitRequested => self.on_submit(&mut effects),
            UiEvent::ValidationCompleted(report) => {
                self.on_validation_completed(*report, &mut effects)
            }
        }
        effects
    }

    fn on_key(&mut self, field: usize, key: Key, caret: Caret, effects: &mut Vec<Effect>) {
        if field >= FIELD_COUNT {
            return;
        }
        self.focus = field;

        match key {
            Key::Char(ch) => {
                // Strip non-digits before any length-based navigation check;
                // a caret position is only advanced by an actual insertion.
                let mut position = caret;
                if self.fields[field].insert(ch, caret.start) {
                    position = Caret::at(caret.start + 1);
                }
                let length = self.fields[field].content.len();
                if length == FIELD_WIDTH && position.is_at(length) {
                    self.advance_focus(field, effects);
                }
            }
            Key::Backspace => {
                if caret.is_at(0) {
                    self.retreat_focus(field, effects);
                } else {
                    self.fields[field].backspace(caret.start);
                }
            }
            Key::ArrowLeft => {
                if caret.is_at(0) {
                    self.retreat_focus(field, effects);
                }
            }
            Key::ArrowRight => {
                if caret.is_at(self.fields[field].content.len()) {
                    self.advance_focus(field, effects);
                }
            }
            Key::Enter => {
                self.refresh_field(field, effects);
                self.refresh_gate(effects);
                self.on_submit(effects);
                return;
            }
        }

        self.refresh_field(field, effects);
        self.refresh_gate(effects);
    }

    fn on_paste(&mut self, text: &str, effects: &mut Vec<Effect>) {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        let total = digits.len();

        for (index, field) in self.fields.iter_mut().enumerate() {
            let start = (index * FIELD_WIDTH).min(digits.len());
            let end = ((index + 1) * FIELD_WIDTH).min(digits.len());
            field.set_content(&digits[start..end]);
        }
        for index in 0..FIELD_COUNT {
            self.refresh_field(index, effects);
        }

        // Focus lands where the pasted data ran out.
        let target = if total <= FIELD_WIDTH {
            0
        } else if total <= 2 * FIELD_WIDTH {
            1
        } else {
            2
        };
        self.focus = target;
        effects.push(Effect::FocusField {
            field: target,
            caret: self.fields[target].content.len(),
        });

        self.refresh_gate(effects);
    }

    fn on_captcha_input(&mut self, content: &str, effects: &mut Vec<Effect>) {
        let Some(captcha) = self.captcha.as_mut() else {
            return;
        };
        let before = captcha.status;
        captcha.set_content(content);
        if captcha.status != before {
            effects.push(Effect::SetFieldStatus {
                slot: FieldSlot::Captcha,
                status: captcha.status,
            });
        }
        self.refresh_gate(effects);
    }

    fn on_submit(&mut self, effects: &mut Vec<Effect>) {
        if !self.form_is_complete() || self.validation_pending {
            return;
        }
        match &self.mode {
            SubmitMode::Direct => effects.push(Effect::SubmitForm),
            SubmitMode::RemoteValidated { csrf_token } => {
                let payload = ValidationPayload {
                    code1: self.fields[0].content.clone(),
                    code2: self.fields[1].content.clone(),
                    code3: self.fields[2].content.clone(),
                    captcha: self.captcha.as_ref().map(|c| c.content.clone()),
                    csrf_token: csrf_token.clone(),
                };
                self.validation_pending = true;
                effects.push(Effect::RequestValidation(payload));
            }
        }
    }

    fn on_validation_completed(
        &mut self,
        report: Option<ValidationReport>,
        effects: &mut Vec<Effect>,
    ) {
        self.validation_pending = false;
        // A failed request is a failed attempt: stay on the form, change
        // nothing, retry only when the user resubmits.
        let Some(report) = report else {
            return;
        };

        let mut all_positive = true;

        if let Some(code_ok) = report.visio_code {
            effects.push(Effect::ClearErrorMessage {
                slot: MessageSlot::Code,
            });
            for index in 0..FIELD_COUNT {
                self.fields[index].remote_error = !code_ok;
                self.refresh_field(index, effects);
            }
            if !code_ok {
                effects.push(Effect::ShowErrorMessage {
                    slot: MessageSlot::Code,
                    text: CODE_ERROR_MESSAGE.to_string(),
                });
                all_positive = false;
            }
        }

        if let Some(captcha_ok) = report.captcha_code {
            if let Some(captcha) = self.captcha.as_mut() {
                effects.push(Effect::ClearErrorMessage {
                    slot: MessageSlot::Captcha,
                });
                let before = captcha.status;
                captcha.server_outcome = Some(captcha_ok);
                captcha.refresh_status();
                if captcha.status != before {
                    effects.push(Effect::SetFieldStatus {
                        slot: FieldSlot::Captcha,
                        status: captcha.status,
                    });
                }
                if !captcha_ok {
                    effects.push(Effect::ShowErrorMessage {
                        slot: MessageSlot::Captcha,
                        text: CAPTCHA_ERROR_MESSAGE.to_string(),
                    });
                }
            }
            if !captcha_ok {
                all_positive = false;
            }
        }

        if all_positive {
            effects.push(Effect::SubmitForm);
        }
    }

    // ------------------------------------------------------------------
    // Focus movement
    // ------------------------------------------------------------------

    fn advance_focus(&mut self, field: usize, effects: &mut Vec<Effect>) {
        if field + 1 >= FIELD_COUNT {
            return;
        }
        self.focus = field + 1;
        effects.push(Effect::FocusField {
            field: self.focus,
            caret: 0,
        });
    }

    fn retreat_focus(&mut self, field: usize, effects: &mut Vec<Effect>) {
        if field == 0 {
            return;
        }
        self.focus = field - 1;
        effects.push(Effect::FocusField {
            field: self.focus,
            caret: self.fields[self.focus].content.len(),
        });
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    fn refresh_field(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let before = self.fields[index].status;
        self.fields[index].refresh_status();
        if self.fields[index].status != before {
            effects.push(Effect::SetFieldStatus {
                slot: FieldSlot::Code(index),
                status: self.fields[index].status,
            });
        }
    }

    /// Recompute the submission gate; runs after every field mutation.
    fn refresh_gate(&mut self, effects: &mut Vec<Effect>) {
        let enabled = self.form_is_complete();
        if enabled != self.submit_enabled {
            self.submit_enabled = enabled;
            effects.push(Effect::SetSubmitEnabled(enabled));
        }
    }
}

impl EventHandler for CodeInputForm {
    fn on_event(&mut self, event: &UiEvent, effects: &mut Vec<Effect>) {
        effects.extend(self.handle_event(event));
    }
}
