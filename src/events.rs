//! Feedback events emitted by the hunt core
//!
//! The core never touches the page. Every user-visible reaction (toast,
//! sound, vibration, re-render) is queued as a [`HuntEvent`] and drained by
//! whichever presentation layer is driving it.

/// Vibration pattern for a successful unlock (on/off/on, ms)
pub const UNLOCK_VIBRATION: [u32; 3] = [30, 40, 20];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntEvent {
    /// A clue was newly unlocked
    Unlocked { clue_id: String, title: String },
    /// A passcode did not match
    CodeRejected { clue_id: String },
    /// An answer was disclosed for the first time
    AnswerRevealed { clue_id: String, answer: String },
    ProgressReset,
    NameChanged { name: String },
    /// Play the unlock sound and vibration
    PlayFeedback,
}

impl HuntEvent {
    /// Short notification text, if the event warrants one
    pub fn message(&self) -> Option<&'static str> {
        match self {
            HuntEvent::Unlocked { .. } => Some("🎃 Unlocked!"),
            HuntEvent::CodeRejected { .. } => Some("❌ Incorrect code"),
            HuntEvent::AnswerRevealed { .. } => Some("🗝️ Answer revealed"),
            HuntEvent::ProgressReset => Some("Progress reset"),
            HuntEvent::NameChanged { .. } | HuntEvent::PlayFeedback => None,
        }
    }

    /// Whether the page must be redrawn after this event
    pub fn needs_render(&self) -> bool {
        !matches!(self, HuntEvent::CodeRejected { .. } | HuntEvent::PlayFeedback)
    }

    /// Failure notices may be shown as a blocking dialog
    pub fn is_failure(&self) -> bool {
        matches!(self, HuntEvent::CodeRejected { .. })
    }
}
