//! Hunt settings and preferences
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

/// How an incorrect passcode is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FeedbackStyle {
    /// Transient toast
    #[default]
    Toast,
    /// Blocking alert dialog
    Dialog,
}

impl FeedbackStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStyle::Toast => "Toast",
            FeedbackStyle::Dialog => "Dialog",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "toast" => Some(FeedbackStyle::Toast),
            "dialog" | "alert" => Some(FeedbackStyle::Dialog),
            _ => None,
        }
    }
}

/// Hunt settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntSettings {
    /// Incorrect-code feedback style
    pub failure_feedback: FeedbackStyle,

    // === Cues ===
    /// Play a sound on unlock
    pub sound: bool,
    /// Vibrate on unlock
    pub haptics: bool,
    /// Cue volume (0.0 - 1.0)
    pub volume: f32,

    // === Features ===
    /// Offer time-gated answer reveals
    pub reveal_answers: bool,
    /// Where the clue catalog is served from
    pub catalog_url: String,
}

impl Default for HuntSettings {
    fn default() -> Self {
        Self {
            failure_feedback: FeedbackStyle::Toast,
            sound: true,
            haptics: true,
            volume: 0.8,
            reveal_answers: true,
            catalog_url: "./clues.json".to_string(),
        }
    }
}

impl HuntSettings {
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Volume actually used for cues (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound { self.volume } else { 0.0 }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hunt_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(storage) = crate::platform::local_storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HuntSettings>(&json) {
                    Ok(mut settings) => {
                        settings.set_volume(settings.volume);
                        log::info!(
                            "Loaded settings from LocalStorage (feedback: {})",
                            settings.failure_feedback.as_str()
                        );
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: defaults, with the feedback style optionally named on the
    /// command line
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_with_feedback(feedback: Option<FeedbackStyle>) -> Self {
        let mut settings = Self::default();
        if let Some(style) = feedback {
            settings.failure_feedback = style;
        }
        log::debug!("Failure feedback: {}", settings.failure_feedback.as_str());
        settings
    }
}
