//! Player progress
//!
//! The durable record of who is playing and which clues they have solved.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Longest accepted player name, in characters
pub const MAX_NAME_CHARS: usize = 32;

/// Phrase that must be typed to wipe progress
pub const RESET_CONFIRMATION: &str = "RESET";

/// Name shown when the player has not set one
pub const DEFAULT_DISPLAY_NAME: &str = "Player";

/// Player name plus unlocked clue ids.
///
/// Ids keep insertion order so a loaded record saves back byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    unlocked: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PlayerProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unlocked: Vec::new(),
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Mark a clue solved. Returns false if it already was.
    pub fn unlock(&mut self, id: &str) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id.to_string());
        true
    }

    pub fn unlocked_ids(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Collapse duplicate ids left behind by hand-edited records
    pub(crate) fn dedup(&mut self) {
        let mut seen = Vec::with_capacity(self.unlocked.len());
        self.unlocked.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
    }

    /// Drop ids the catalog does not know. Returns how many were dropped.
    pub fn retain_known(&mut self, catalog: &Catalog) -> usize {
        let before = self.unlocked.len();
        self.unlocked.retain(|id| catalog.contains(id));
        before - self.unlocked.len()
    }

    /// Completion percentage against a catalog of `total` clues
    pub fn percent(&self, total: usize) -> u8 {
        percent(self.unlocked.len(), total)
    }

    /// Set the player name. Empty input (after trimming) is ignored.
    pub fn set_name(&mut self, raw: &str) -> bool {
        match normalize_name(raw) {
            Some(name) => {
                self.name = name;
                true
            }
            None => false,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.name
        }
    }

    /// Clear unlocks if `confirmation` is the reset phrase. Name is kept.
    pub fn reset(&mut self, confirmation: &str) -> bool {
        if !confirms_reset(confirmation) {
            return false;
        }
        self.unlocked.clear();
        true
    }
}

/// `round(100 * unlocked / total)`, 0 for an empty catalog
pub fn percent(unlocked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let unlocked = unlocked.min(total);
    // Integer half-up rounding
    ((200 * unlocked + total) / (2 * total)) as u8
}

/// Trim and truncate a player name; None if nothing remains
pub fn normalize_name(raw: &str) -> Option<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end().to_string();
    (!name.is_empty()).then_some(name)
}

pub fn confirms_reset(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(RESET_CONFIRMATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Clue;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut progress = PlayerProgress::default();
        assert!(progress.unlock("c1"));
        assert!(!progress.unlock("c1"));
        assert_eq!(progress.unlocked_count(), 1);
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("  Michael  ").as_deref(), Some("Michael"));
        assert_eq!(normalize_name("   "), None);
        let long = "ä".repeat(40);
        assert_eq!(normalize_name(&long).unwrap().chars().count(), MAX_NAME_CHARS);

        let mut progress = PlayerProgress::new("Ann");
        assert!(!progress.set_name("  "));
        assert_eq!(progress.name, "Ann");
        assert!(progress.set_name(" Bo "));
        assert_eq!(progress.display_name(), "Bo");
        assert_eq!(PlayerProgress::default().display_name(), "Player");
    }

    #[test]
    fn test_reset_requires_phrase() {
        let mut progress = PlayerProgress::new("Ann");
        progress.unlock("c1");

        assert!(!progress.reset("yes"));
        assert!(!progress.reset("RESET!"));
        assert_eq!(progress.unlocked_count(), 1);

        assert!(progress.reset("  reset "));
        assert_eq!(progress.unlocked_count(), 0);
        assert_eq!(progress.name, "Ann");
    }

    #[test]
    fn test_retain_known() {
        let catalog = Catalog::new(vec![Clue::new("c1", "One", &["A"])]).unwrap();
        let mut progress = PlayerProgress::default();
        progress.unlock("c1");
        progress.unlock("gone");
        assert_eq!(progress.retain_known(&catalog), 1);
        assert_eq!(progress.unlocked_ids().collect::<Vec<_>>(), vec!["c1"]);
    }

    #[test]
    fn test_tolerant_deserialize() {
        let progress: PlayerProgress =
            serde_json::from_str(r#"{"name": null, "unlocked": ["a"], "future": true}"#).unwrap();
        assert_eq!(progress.name, "");
        assert!(progress.is_unlocked("a"));

        let progress: PlayerProgress = serde_json::from_str("{}").unwrap();
        assert_eq!(progress, PlayerProgress::default());
    }
}
