//! Time-gated answer disclosure
//!
//! A clue carrying both `answer` and `reveal_at` can have its answer shown
//! once the reveal time has passed. The revealed flag is session-local and
//! never persisted, so a reload hides answers again.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::catalog::Clue;

/// Whether a clue's answer can be revealed right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    /// Clue has no time-gated answer
    Unavailable,
    /// Reveal time not reached yet
    Locked { remaining: TimeDelta },
    Ready,
}

/// Result of asking to reveal an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Unavailable,
    /// Too early; nothing changed
    Locked { remaining: TimeDelta },
    /// First successful reveal, carrying the answer text
    Revealed(String),
    /// Answer was already shown this session
    AlreadyRevealed,
}

/// Session-local revealed flags
#[derive(Debug, Clone, Default)]
pub struct RevealGate {
    revealed: HashSet<String>,
}

impl RevealGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_reveal(&self, clue: &Clue, now: DateTime<Utc>) -> RevealStatus {
        let Some((_, reveal_at)) = clue.gated_answer() else {
            return RevealStatus::Unavailable;
        };
        if now < reveal_at {
            RevealStatus::Locked {
                remaining: reveal_at - now,
            }
        } else {
            RevealStatus::Ready
        }
    }

    /// Reveal the answer. Yields the text exactly once per session.
    pub fn reveal(&mut self, clue: &Clue, now: DateTime<Utc>) -> RevealOutcome {
        let Some((answer, _)) = clue.gated_answer() else {
            return RevealOutcome::Unavailable;
        };
        match self.check_reveal(clue, now) {
            RevealStatus::Unavailable => RevealOutcome::Unavailable,
            RevealStatus::Locked { remaining } => RevealOutcome::Locked { remaining },
            RevealStatus::Ready => {
                if self.revealed.insert(clue.id.clone()) {
                    RevealOutcome::Revealed(answer.to_string())
                } else {
                    RevealOutcome::AlreadyRevealed
                }
            }
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn clear(&mut self) {
        self.revealed.clear();
    }
}

/// Render time left until a reveal.
///
/// Whole seconds rounded up, shown as `Xd Yh Zm`, `Xh Ym Zs`, `Xm Ys` or `Zs`
/// depending on the largest non-zero unit. Non-positive durations are `Ready`.
pub fn format_countdown(remaining: TimeDelta) -> String {
    if remaining <= TimeDelta::zero() {
        return "Ready".to_string();
    }
    let secs = remaining.num_seconds() + i64::from(remaining.subsec_nanos() > 0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    let s = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m {s}s")
    } else if mins > 0 {
        format!("{mins}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Label for a reveal button in the given state
pub fn reveal_label(status: RevealStatus) -> String {
    match status {
        RevealStatus::Locked { remaining } => format!("Reveal in {}", format_countdown(remaining)),
        RevealStatus::Ready | RevealStatus::Unavailable => "Reveal Answer".to_string(),
    }
}
