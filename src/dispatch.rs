//! Single-threaded event dispatch for the page widgets.
//!
//! The host page used to wire DOM listeners directly; here the same wiring is
//! explicit. Components implement [`EventHandler`] and register on a
//! [`Dispatcher`], which drains a FIFO queue and offers each event to every
//! handler in registration order. Handlers never touch the presentation layer
//! themselves: they describe what should happen with [`Effect`] values and
//! the host applies them.

use std::collections::VecDeque;

use crate::models::{ValidationPayload, ValidationReport};

// ============================================================================
// Events
// ============================================================================

/// Caret state of an input at the moment an event fired.
///
/// `start == end` is a collapsed caret; a selection spans `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub start: usize,
    pub end: usize,
}

impl Caret {
    /// A collapsed caret at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// True when the caret is collapsed exactly at `offset`.
    pub fn is_at(&self, offset: usize) -> bool {
        self.start == offset && self.end == offset
    }
}

/// Keys the code-input widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character. Non-digits are stripped before they ever reach
    /// field content.
    Char(char),
    Backspace,
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// An input event delivered to the widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Keystroke in code field `field`, with the caret as it was when the
    /// event fired.
    Key { field: usize, key: Key, caret: Caret },
    /// Paste targeting any of the code fields.
    Paste { text: String },
    /// The captcha companion's content after an edit.
    CaptchaInput { content: String },
    /// The submit control was activated.
    SubmitRequested,
    /// The in-flight remote validation finished. `None` means the request
    /// failed in transport or the reply was unusable.
    ValidationCompleted(Option<ValidationReport>),
}

// ============================================================================
// Effects
// ============================================================================

/// Which input group a status or message effect applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    Code(usize),
    Captcha,
}

/// Which inline message area an effect applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSlot {
    Code,
    Captcha,
}

/// A presentation-side action the host should perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Move focus to code field `field` and place the caret at `caret`.
    FocusField { field: usize, caret: usize },
    /// Repaint a field group's visual status.
    SetFieldStatus {
        slot: FieldSlot,
        status: crate::code_input::FieldStatus,
    },
    /// Enable or disable the submit control.
    SetSubmitEnabled(bool),
    /// Show an inline error message.
    ShowErrorMessage { slot: MessageSlot, text: String },
    /// Remove an inline error message if present.
    ClearErrorMessage { slot: MessageSlot },
    /// Perform the remote validation call with this payload, then post
    /// `UiEvent::ValidationCompleted` back into the loop.
    RequestValidation(ValidationPayload),
    /// Submit the form for real; the user leaves the page.
    SubmitForm,
    /// Close the current window after `delay_ms` milliseconds.
    CloseWindow { delay_ms: u64 },
}

// ============================================================================
// Dispatcher
// ============================================================================

/// A component that reacts to events by appending effects.
pub trait EventHandler {
    fn on_event(&mut self, event: &UiEvent, effects: &mut Vec<Effect>);
}

/// FIFO event queue with handlers called in registration order.
///
/// Everything runs on the caller's thread; ordering is exactly the order in
/// which events were posted.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn EventHandler>>,
    queue: VecDeque<UiEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers see every event, in registration order.
    pub fn register(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Queue an event for the next run.
    pub fn post(&mut self, event: UiEvent) {
        self.queue.push_back(event);
    }

    /// Drain the queue, collecting every effect the handlers produced.
    pub fn run_until_idle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            for handler in self.handlers.iter_mut() {
                handler.on_event(&event, &mut effects);
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records `(handler id, event)` pairs into a shared log.
    struct Recorder {
        id: usize,
        log: Rc<RefCell<Vec<(usize, UiEvent)>>>,
    }

    impl EventHandler for Recorder {
        fn on_event(&mut self, event: &UiEvent, _effects: &mut Vec<Effect>) {
            self.log.borrow_mut().push((self.id, event.clone()));
        }
    }

    #[test]
    fn test_events_delivered_fifo_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(Recorder {
            id: 0,
            log: log.clone(),
        }));
        dispatcher.register(Box::new(Recorder {
            id: 1,
            log: log.clone(),
        }));

        dispatcher.post(UiEvent::SubmitRequested);
        dispatcher.post(UiEvent::CaptchaInput {
            content: "x".to_string(),
        });
        dispatcher.run_until_idle();

        let log = log.borrow();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0], (0, UiEvent::SubmitRequested));
        assert_eq!(log[1], (1, UiEvent::SubmitRequested));
        assert!(matches!(log[2], (0, UiEvent::CaptchaInput { .. })));
        assert!(matches!(log[3], (1, UiEvent::CaptchaInput { .. })));
    }

    #[test]
    fn test_queue_is_empty_after_run() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(Recorder {
            id: 0,
            log: log.clone(),
        }));

        dispatcher.post(UiEvent::SubmitRequested);
        dispatcher.run_until_idle();
        assert!(dispatcher.run_until_idle().is_empty());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_caret_helpers() {
        assert!(Caret::at(3).is_at(3));
        assert!(!Caret::at(3).is_at(0));
        let selection = Caret { start: 0, end: 2 };
        assert!(!selection.is_at(0));
    }
}
