//! Input normalization
//!
//! Keyboard, mouse and touch all collapse into one [`Action`]. What the action
//! means depends on the game phase and is decided by [`crate::Game`].

/// Kind of raw browser input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInputKind {
    /// `keydown` with its `KeyboardEvent.code`
    Key(String),
    /// Primary pointer press (`mousedown`)
    Pointer,
    /// `touchstart`
    Touch,
}

/// A raw input event as the platform layer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub kind: RawInputKind,
    /// True when the event target sits inside a `<button>`
    pub target_is_control: bool,
}

impl RawInput {
    pub fn key(code: &str) -> Self {
        Self {
            kind: RawInputKind::Key(code.to_string()),
            target_is_control: false,
        }
    }

    pub fn pointer() -> Self {
        Self {
            kind: RawInputKind::Pointer,
            target_is_control: false,
        }
    }

    pub fn touch() -> Self {
        Self {
            kind: RawInputKind::Touch,
            target_is_control: false,
        }
    }

    /// Mark the event as aimed at an interactive control
    pub fn on_control(mut self) -> Self {
        self.target_is_control = true;
        self
    }
}

/// The single game action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start from Idle, impulse while Running
    Primary,
}

/// Result of normalizing one raw event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedInput {
    pub action: Action,
    /// Suppress the browser's default handling (scroll/zoom on touch)
    pub prevent_default: bool,
}

/// Key code that triggers the action
pub const ACTION_KEY: &str = "Space";

/// Map a raw event to an action. Other keys and presses on controls are
/// ignored.
pub fn normalize(input: &RawInput) -> Option<NormalizedInput> {
    if input.target_is_control
        || matches!(&input.kind, RawInputKind::Key(code) if code != ACTION_KEY)
    {
        return None;
    }

    Some(NormalizedInput {
        action: Action::Primary,
        prevent_default: matches!(input.kind, RawInputKind::Touch),
    })
}
