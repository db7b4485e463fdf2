//! Progress persistence
//!
//! Features:
//! - Single versioned JSON record (`hunt_progress_v1`)
//! - Forward-tolerant reads: unknown fields ignored, missing ones defaulted
//! - Corruption recovery: a bad record loads as fresh progress
//! - Backends: in-memory, file (native), LocalStorage (web)

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::progress::PlayerProgress;

/// Storage key (and schema version) of the progress record
pub const PROGRESS_KEY: &str = "hunt_progress_v1";

/// Durable home for [`PlayerProgress`].
///
/// Backends only move raw JSON text; decoding, recovery and logging are
/// shared by the provided `load`/`save`.
pub trait ProgressStore {
    /// Raw record, or None if nothing has been saved yet
    fn read_record(&self) -> Result<Option<String>, StoreError>;

    /// Replace the record atomically: readers see the old record or the new one
    fn write_record(&mut self, json: &str) -> Result<(), StoreError>;

    /// Load progress. Never fails: missing or corrupt records yield fresh progress.
    fn load(&self) -> PlayerProgress {
        let raw = match self.read_record() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No saved progress found, starting fresh");
                return PlayerProgress::default();
            }
            Err(e) => {
                log::warn!("Could not read saved progress, starting fresh: {e}");
                return PlayerProgress::default();
            }
        };

        match decode(&raw) {
            Ok(progress) => {
                log::info!(
                    "Loaded progress for {:?} ({} unlocked)",
                    progress.name,
                    progress.unlocked_count()
                );
                progress
            }
            Err(e) => {
                log::warn!("Saved progress is corrupt, starting fresh: {e}");
                PlayerProgress::default()
            }
        }
    }

    /// Persist the full progress record, replacing any previous one
    fn save(&mut self, progress: &PlayerProgress) -> Result<(), StoreError> {
        let json = encode(progress)?;
        self.write_record(&json)?;
        log::debug!("Progress saved ({} unlocked)", progress.unlocked_count());
        Ok(())
    }
}

/// Decode a persisted record
pub fn decode(raw: &str) -> Result<PlayerProgress, serde_json::Error> {
    let mut progress: PlayerProgress = serde_json::from_str(raw)?;
    progress.dedup();
    Ok(progress)
}

/// Encode progress as its persisted record
pub fn encode(progress: &PlayerProgress) -> Result<String, serde_json::Error> {
    serde_json::to_string(progress)
}
