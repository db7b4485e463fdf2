//! Passcode validation

use crate::catalog::Clue;

/// Outcome of a passcode submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockResult {
    Accepted,
    Rejected,
}

/// Canonical form of typed input: trimmed and upper-cased
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Whether `raw` matches any of the clue's accepted codes
pub fn check_code(clue: &Clue, raw: &str) -> UnlockResult {
    let typed = normalize_code(raw);
    if typed.is_empty() {
        return UnlockResult::Rejected;
    }
    if clue.codes.iter().any(|code| code.to_uppercase() == typed) {
        UnlockResult::Accepted
    } else {
        UnlockResult::Rejected
    }
}
