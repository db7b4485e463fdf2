//! Scavenger Hunt - passcode-unlocked clues in the browser
//!
//! Core modules:
//! - `catalog`: Clue records loaded from `clues.json`
//! - `progress`: Player name and unlocked clue ids
//! - `persistence`: Save/load with corruption recovery
//! - `unlock`: Passcode validation
//! - `reveal`: Time-gated answer disclosure and countdowns
//! - `hunt`: Controller tying the above together and emitting events
//! - `platform`: Browser/native platform abstraction

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod catalog;
pub mod error;
pub mod events;
pub mod hunt;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod reveal;
pub mod settings;
pub mod unlock;

pub use catalog::{Catalog, Clue};
pub use error::{CatalogError, HuntError, StoreError};
pub use events::HuntEvent;
pub use hunt::{Countdown, Hunt};
pub use persistence::{MemoryStore, ProgressStore};
pub use progress::PlayerProgress;
pub use reveal::{RevealGate, RevealOutcome, RevealStatus, format_countdown};
pub use settings::{FeedbackStyle, HuntSettings};
pub use unlock::UnlockResult;

/// Runtime constants
pub mod consts {
    /// Countdown refresh period
    pub const COUNTDOWN_TICK_MS: i32 = 1_000;
    /// How long a toast stays visible
    pub const TOAST_MS: i32 = 1_600;
}
