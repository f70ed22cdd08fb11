//! Widget state and the pure mapping from state to UI effects.

use crate::errors::BookingError;

pub const SENDING_MESSAGE: &str = "Sending booking...";
pub const SUCCESS_MESSAGE: &str = "Booking received. We will contact you shortly.";
pub const FALLBACK_MESSAGE: &str =
    "Automatic submission failed - please use the fallback form below or contact us.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(BookingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Info,
    Success,
    Error,
}

impl MessageTone {
    /// CSS class set on the message element.
    pub fn class(self) -> &'static str {
        match self {
            MessageTone::Info => "",
            MessageTone::Success => "success",
            MessageTone::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: MessageTone,
}

/// What happens to the manual fallback form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackWidget {
    Unchanged,
    Hidden,
    Revealed { scroll_into_view: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEffects {
    pub submit_disabled: bool,
    pub aria_busy: bool,
    /// `None` leaves the message element as it is.
    pub message: Option<Message>,
    pub fallback: FallbackWidget,
    pub reset_form: bool,
}

pub fn render(state: &FormState) -> ViewEffects {
    let idle = ViewEffects {
        submit_disabled: false,
        aria_busy: false,
        message: None,
        fallback: FallbackWidget::Unchanged,
        reset_form: false,
    };
    let say = |text: &str, tone| Some(Message { text: text.to_string(), tone });

    match state {
        FormState::Idle => idle,
        FormState::Submitting => ViewEffects {
            submit_disabled: true,
            aria_busy: true,
            message: say(SENDING_MESSAGE, MessageTone::Info),
            ..idle
        },
        FormState::Success => ViewEffects {
            message: say(SUCCESS_MESSAGE, MessageTone::Success),
            fallback: FallbackWidget::Hidden,
            reset_form: true,
            ..idle
        },
        FormState::Error(BookingError::Exhausted { .. }) => ViewEffects {
            message: say(FALLBACK_MESSAGE, MessageTone::Error),
            fallback: FallbackWidget::Revealed { scroll_into_view: true },
            ..idle
        },
        FormState::Error(err) => ViewEffects { message: say(&err.to_string(), MessageTone::Error), ..idle },
    }
}

/// Applies rendered effects to whatever hosts the form.
pub trait BookingView {
    fn apply(&mut self, effects: &ViewEffects);
}

/// In-memory model of the widget's DOM: submit control, message element and
/// fallback container. Elements the page does not have are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetModel {
    pub has_message: bool,
    pub has_fallback: bool,
    pub submit_disabled: bool,
    pub aria_busy: bool,
    pub message_visible: bool,
    pub message_text: String,
    pub message_class: &'static str,
    pub fallback_visible: bool,
    pub fallback_scrolls: usize,
    pub resets: usize,
}

impl Default for WidgetModel {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl WidgetModel {
    pub fn new(has_message: bool, has_fallback: bool) -> Self {
        Self {
            has_message,
            has_fallback,
            submit_disabled: false,
            aria_busy: false,
            message_visible: false,
            message_text: String::new(),
            message_class: "",
            fallback_visible: false,
            fallback_scrolls: 0,
            resets: 0,
        }
    }
}

impl BookingView for WidgetModel {
    fn apply(&mut self, effects: &ViewEffects) {
        self.submit_disabled = effects.submit_disabled;
        self.aria_busy = effects.aria_busy;
        if let (true, Some(msg)) = (self.has_message, &effects.message) {
            self.message_visible = true;
            self.message_text = msg.text.clone();
            self.message_class = msg.tone.class();
        }
        if effects.reset_form {
            self.resets += 1;
        }
        if self.has_fallback {
            match effects.fallback {
                FallbackWidget::Unchanged => {}
                FallbackWidget::Hidden => self.fallback_visible = false,
                FallbackWidget::Revealed { scroll_into_view } => {
                    self.fallback_visible = true;
                    if scroll_into_view {
                        self.fallback_scrolls += 1;
                    }
                }
            }
        }
    }
}
