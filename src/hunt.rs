//! Hunt controller
//!
//! Owns the catalog, the player's progress, the store it persists to and the
//! session's reveal flags. Every user action goes through here; each one
//! mutates state, persists if anything changed, and queues [`HuntEvent`]s.

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, Clue};
use crate::error::HuntError;
use crate::events::HuntEvent;
use crate::persistence::ProgressStore;
use crate::progress::PlayerProgress;
use crate::reveal::{RevealGate, RevealOutcome, RevealStatus, reveal_label};
use crate::unlock::{UnlockResult, check_code};

/// Countdown state of one reveal button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub clue_id: String,
    pub status: RevealStatus,
    pub label: String,
}

impl Countdown {
    pub fn is_ready(&self) -> bool {
        self.status == RevealStatus::Ready
    }
}

fn find<'a>(catalog: &'a Catalog, clue_id: &str) -> Result<&'a Clue, HuntError> {
    catalog
        .get(clue_id)
        .ok_or_else(|| HuntError::UnknownClue(clue_id.to_string()))
}

pub struct Hunt<S: ProgressStore> {
    catalog: Catalog,
    progress: PlayerProgress,
    store: S,
    gate: RevealGate,
    reveal_enabled: bool,
    events: Vec<HuntEvent>,
}

impl<S: ProgressStore> Hunt<S> {
    /// Load saved progress from `store` and attach it to `catalog`
    pub fn new(catalog: Catalog, store: S) -> Self {
        let mut progress = store.load();
        let dropped = progress.retain_known(&catalog);
        if dropped > 0 {
            log::warn!("Ignoring {dropped} unlocked ids not in the catalog");
        }
        Self {
            catalog,
            progress,
            store,
            gate: RevealGate::new(),
            reveal_enabled: true,
            events: Vec::new(),
        }
    }

    /// Turn the answer-reveal feature on or off
    pub fn set_reveal_enabled(&mut self, enabled: bool) {
        self.reveal_enabled = enabled;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn percent(&self) -> u8 {
        self.progress.percent(self.catalog.len())
    }

    pub fn is_unlocked(&self, clue_id: &str) -> bool {
        self.progress.is_unlocked(clue_id)
    }

    pub fn is_revealed(&self, clue_id: &str) -> bool {
        self.gate.is_revealed(clue_id)
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.progress) {
            log::error!("Failed to save progress: {e}");
        }
    }

    /// Set the player name; blank input is ignored
    pub fn set_name(&mut self, raw: &str) -> bool {
        if !self.progress.set_name(raw) {
            return false;
        }
        self.persist();
        log::info!("Player name set to {:?}", self.progress.name);
        self.events.push(HuntEvent::NameChanged {
            name: self.progress.name.clone(),
        });
        true
    }

    /// Try a passcode for a clue
    pub fn submit_code(&mut self, clue_id: &str, raw: &str) -> Result<UnlockResult, HuntError> {
        let clue = find(&self.catalog, clue_id)?;
        let result = check_code(clue, raw);
        let title = clue.title.clone();

        match result {
            UnlockResult::Accepted => {
                if self.progress.unlock(clue_id) {
                    self.persist();
                    log::info!("Unlocked {clue_id} ({}%)", self.percent());
                    self.events.push(HuntEvent::Unlocked {
                        clue_id: clue_id.to_string(),
                        title,
                    });
                    self.events.push(HuntEvent::PlayFeedback);
                }
            }
            UnlockResult::Rejected => {
                log::debug!("Rejected code for {clue_id}");
                self.events.push(HuntEvent::CodeRejected {
                    clue_id: clue_id.to_string(),
                });
            }
        }
        Ok(result)
    }

    /// Reveal status of a clue; only unlocked clues can be revealed
    pub fn check_reveal(&self, clue_id: &str, now: DateTime<Utc>) -> Result<RevealStatus, HuntError> {
        let clue = find(&self.catalog, clue_id)?;
        if !self.reveal_enabled || !self.progress.is_unlocked(clue_id) {
            return Ok(RevealStatus::Unavailable);
        }
        Ok(self.gate.check_reveal(clue, now))
    }

    /// Ask for a clue's answer
    pub fn reveal(&mut self, clue_id: &str, now: DateTime<Utc>) -> Result<RevealOutcome, HuntError> {
        let clue = find(&self.catalog, clue_id)?;
        if !self.reveal_enabled || !self.progress.is_unlocked(clue_id) {
            return Ok(RevealOutcome::Unavailable);
        }
        let outcome = self.gate.reveal(clue, now);
        if let RevealOutcome::Revealed(answer) = &outcome {
            log::info!("Answer revealed for {clue_id}");
            self.events.push(HuntEvent::AnswerRevealed {
                clue_id: clue_id.to_string(),
                answer: answer.clone(),
            });
        }
        Ok(outcome)
    }

    /// Wipe unlocks if `confirmation` is the reset phrase
    pub fn reset(&mut self, confirmation: &str) -> bool {
        if !self.progress.reset(confirmation) {
            return false;
        }
        self.gate.clear();
        self.persist();
        log::info!("Progress reset");
        self.events.push(HuntEvent::ProgressReset);
        true
    }

    /// Reveal buttons still on screen: unlocked, gated, not yet revealed
    pub fn countdowns(&self, now: DateTime<Utc>) -> Vec<Countdown> {
        if !self.reveal_enabled {
            return Vec::new();
        }
        self.catalog
            .clues()
            .iter()
            .filter(|c| self.progress.is_unlocked(&c.id) && !self.gate.is_revealed(&c.id))
            .filter_map(|c| match self.gate.check_reveal(c, now) {
                RevealStatus::Unavailable => None,
                status => Some(Countdown {
                    clue_id: c.id.clone(),
                    status,
                    label: reveal_label(status),
                }),
            })
            .collect()
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<HuntEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::persistence::MemoryStore;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Clue::new("c1", "Porch", &["ABC"]).with_text("Look under the mat"),
            Clue::new("c2", "Attic", &["XYZ"]),
        ])
        .unwrap()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 31, h, 0, 0).unwrap()
    }

    /// Store whose writes always fail, e.g. a full or blocked LocalStorage
    struct FailingStore {
        attempts: usize,
    }

    impl ProgressStore for FailingStore {
        fn read_record(&self) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write_record(&mut self, _json: &str) -> Result<(), StoreError> {
            self.attempts += 1;
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn test_worked_example() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        assert_eq!(hunt.percent(), 0);

        assert_eq!(hunt.submit_code("c1", "abc ").unwrap(), UnlockResult::Accepted);
        assert!(hunt.is_unlocked("c1"));
        assert_eq!(hunt.percent(), 50);

        assert_eq!(hunt.submit_code("c2", "QQQ").unwrap(), UnlockResult::Rejected);
        assert!(!hunt.is_unlocked("c2"));
        assert_eq!(hunt.percent(), 50);

        assert_eq!(
            hunt.drain_events(),
            vec![
                HuntEvent::Unlocked {
                    clue_id: "c1".into(),
                    title: "Porch".into()
                },
                HuntEvent::PlayFeedback,
                HuntEvent::CodeRejected {
                    clue_id: "c2".into()
                },
            ]
        );
        assert!(hunt.drain_events().is_empty());
    }

    #[test]
    fn test_unlock_persists_once() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        hunt.submit_code("c1", "ABC").unwrap();
        assert_eq!(hunt.store().writes(), 1);
        assert_eq!(hunt.store().record(), Some(r#"{"name":"","unlocked":["c1"]}"#));

        hunt.drain_events();
        assert_eq!(hunt.submit_code("c1", "abc").unwrap(), UnlockResult::Accepted);
        assert_eq!(hunt.store().writes(), 1);
        assert!(hunt.drain_events().is_empty());
    }

    #[test]
    fn test_rejection_does_not_persist() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        hunt.submit_code("c1", "nope").unwrap();
        assert_eq!(hunt.store().writes(), 0);
    }

    #[test]
    fn test_failed_save_keeps_session_state() {
        let mut hunt = Hunt::new(catalog(), FailingStore { attempts: 0 });

        assert_eq!(hunt.submit_code("c1", "abc").unwrap(), UnlockResult::Accepted);
        assert_eq!(hunt.store().attempts, 1);
        assert!(hunt.is_unlocked("c1"));
        assert_eq!(hunt.percent(), 50);
        assert_eq!(
            hunt.drain_events(),
            vec![
                HuntEvent::Unlocked {
                    clue_id: "c1".into(),
                    title: "Porch".into()
                },
                HuntEvent::PlayFeedback,
            ]
        );

        assert!(hunt.set_name("Ann"));
        assert_eq!(hunt.progress().name, "Ann");
        assert!(hunt.reset("reset"));
        assert!(!hunt.is_unlocked("c1"));
        assert_eq!(hunt.store().attempts, 3);
        assert_eq!(
            hunt.drain_events(),
            vec![
                HuntEvent::NameChanged { name: "Ann".into() },
                HuntEvent::ProgressReset,
            ]
        );
    }

    #[test]
    fn test_unknown_clue_fails_fast() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        assert_eq!(
            hunt.submit_code("c9", "ABC"),
            Err(HuntError::UnknownClue("c9".into()))
        );
        assert!(hunt.reveal("c9", at(20)).is_err());
        assert!(hunt.drain_events().is_empty());
        assert_eq!(hunt.store().writes(), 0);
    }

    #[test]
    fn test_resume_from_store() {
        let store = MemoryStore::with_record(r#"{"name":"Ann","unlocked":["c2","retired"]}"#);
        let hunt = Hunt::new(catalog(), store);
        assert_eq!(hunt.progress().name, "Ann");
        assert!(hunt.is_unlocked("c2"));
        assert!(!hunt.is_unlocked("retired"));
        assert_eq!(hunt.percent(), 50);
        // Pruning alone does not rewrite the record
        assert_eq!(hunt.store().writes(), 0);
    }

    #[test]
    fn test_set_name() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        assert!(!hunt.set_name("   "));
        assert_eq!(hunt.store().writes(), 0);

        assert!(hunt.set_name("  Michael "));
        assert_eq!(hunt.progress().name, "Michael");
        assert_eq!(hunt.store().record(), Some(r#"{"name":"Michael","unlocked":[]}"#));
        assert_eq!(
            hunt.drain_events(),
            vec![HuntEvent::NameChanged {
                name: "Michael".into()
            }]
        );
    }

    #[test]
    fn test_reset() {
        let mut hunt = Hunt::new(catalog(), MemoryStore::new());
        hunt.set_name("Ann");
        hunt.submit_code("c1", "abc").unwrap();
        hunt.drain_events();

        assert!(!hunt.reset("please"));
        assert_eq!(hunt.percent(), 50);
        assert!(hunt.drain_events().is_empty());

        assert!(hunt.reset(" Reset"));
        assert_eq!(hunt.percent(), 0);
        assert_eq!(hunt.progress().name, "Ann");
        assert_eq!(hunt.store().record(), Some(r#"{"name":"Ann","unlocked":[]}"#));
        assert_eq!(hunt.drain_events(), vec![HuntEvent::ProgressReset]);
    }

    #[test]
    fn test_reveal_flow() {
        let catalog = Catalog::new(vec![
            Clue::new("c1", "Crypt", &["BONES"]).with_reveal("Under the oak", at(20)),
        ])
        .unwrap();
        let mut hunt = Hunt::new(catalog, MemoryStore::new());

        // Locked clues never offer a reveal
        assert_eq!(hunt.reveal("c1", at(21)).unwrap(), RevealOutcome::Unavailable);
        assert!(hunt.countdowns(at(21)).is_empty());

        hunt.submit_code("c1", "bones").unwrap();
        hunt.drain_events();

        let countdowns = hunt.countdowns(at(19));
        assert_eq!(countdowns.len(), 1);
        assert_eq!(countdowns[0].label, "Reveal in 1h 0m 0s");
        assert!(!countdowns[0].is_ready());

        assert!(matches!(
            hunt.reveal("c1", at(19)).unwrap(),
            RevealOutcome::Locked { .. }
        ));
        assert!(hunt.drain_events().is_empty());

        assert!(hunt.countdowns(at(20))[0].is_ready());
        assert_eq!(
            hunt.reveal("c1", at(20)).unwrap(),
            RevealOutcome::Revealed("Under the oak".into())
        );
        assert_eq!(hunt.reveal("c1", at(22)).unwrap(), RevealOutcome::AlreadyRevealed);
        assert!(hunt.countdowns(at(22)).is_empty());
        assert_eq!(
            hunt.drain_events(),
            vec![HuntEvent::AnswerRevealed {
                clue_id: "c1".into(),
                answer: "Under the oak".into()
            }]
        );

        // Reveals are session state and never persisted
        assert_eq!(hunt.store().record(), Some(r#"{"name":"","unlocked":["c1"]}"#));
    }

    #[test]
    fn test_reveal_disabled() {
        let catalog = Catalog::new(vec![
            Clue::new("c1", "Crypt", &["BONES"]).with_reveal("Oak", at(20)),
        ])
        .unwrap();
        let mut hunt = Hunt::new(catalog, MemoryStore::new());
        hunt.set_reveal_enabled(false);
        hunt.submit_code("c1", "BONES").unwrap();
        assert_eq!(hunt.check_reveal("c1", at(21)).unwrap(), RevealStatus::Unavailable);
        assert_eq!(hunt.reveal("c1", at(21)).unwrap(), RevealOutcome::Unavailable);
        assert!(hunt.countdowns(at(21)).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let hunt = Hunt::new(Catalog::default(), MemoryStore::new());
        assert_eq!(hunt.percent(), 0);
    }

    fn code_catalog(codes: &[String]) -> Catalog {
        let clues = codes
            .iter()
            .enumerate()
            .map(|(i, code)| Clue::new(format!("c{i}"), format!("Clue {i}"), &[code.as_str()]))
            .collect();
        Catalog::new(clues).unwrap()
    }

    fn vary_case(code: &str, mask: &[bool]) -> String {
        code.chars()
            .zip(mask.iter().cycle())
            .map(|(ch, upper)| {
                if *upper {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_percent_monotonic(
            codes in proptest::collection::vec("[A-Z]{3,6}", 1..12),
            order in proptest::collection::vec(0..12usize, 0..30)
        ) {
            let mut hunt = Hunt::new(code_catalog(&codes), MemoryStore::new());
            let mut last = hunt.percent();
            for idx in order {
                let idx = idx % codes.len();
                hunt.submit_code(&format!("c{idx}"), &codes[idx]).unwrap();
                let pct = hunt.percent();
                prop_assert!(pct >= last);
                prop_assert!(pct <= 100);
                last = pct;
            }
        }

        #[test]
        fn prop_any_case_and_padding_unlocks_once(
            code in "[A-Za-z0-9]{1,10}",
            mask in proptest::collection::vec(any::<bool>(), 1..10),
            pad_left in "[ \t]{0,3}",
            pad_right in "[ \t\n]{0,3}"
        ) {
            let mut hunt = Hunt::new(code_catalog(&[code.clone()]), MemoryStore::new());
            let typed = format!("{pad_left}{}{pad_right}", vary_case(&code, &mask));

            prop_assert_eq!(hunt.submit_code("c0", &typed).unwrap(), UnlockResult::Accepted);
            prop_assert_eq!(hunt.submit_code("c0", &typed).unwrap(), UnlockResult::Accepted);
            prop_assert_eq!(hunt.progress().unlocked_count(), 1);
            prop_assert_eq!(hunt.store().writes(), 1);
            let unlocks = hunt
                .drain_events()
                .into_iter()
                .filter(|e| matches!(e, HuntEvent::Unlocked { .. }))
                .count();
            prop_assert_eq!(unlocks, 1);
        }

        #[test]
        fn prop_wrong_code_never_mutates(
            code in "[A-Z]{4}",
            guess in "[a-z0-9 ]{0,8}"
        ) {
            prop_assume!(guess.trim().to_uppercase() != code);
            let mut hunt = Hunt::new(code_catalog(&[code]), MemoryStore::new());
            let before = hunt.progress().clone();
            prop_assert_eq!(hunt.submit_code("c0", &guess).unwrap(), UnlockResult::Rejected);
            prop_assert_eq!(hunt.progress(), &before);
            prop_assert_eq!(hunt.store().writes(), 0);
        }

        #[test]
        fn prop_reset_only_with_phrase(input in "[A-Za-z ]{0,8}") {
            let mut hunt = Hunt::new(code_catalog(&["ABC".to_string()]), MemoryStore::new());
            hunt.set_name("Ann");
            hunt.submit_code("c0", "abc").unwrap();

            let applied = hunt.reset(&input);
            prop_assert_eq!(applied, input.trim().eq_ignore_ascii_case("reset"));
            prop_assert_eq!(hunt.progress().unlocked_count(), if applied { 0 } else { 1 });
            prop_assert_eq!(hunt.progress().name.as_str(), "Ann");
        }
    }
}
