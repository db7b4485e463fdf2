//! Clue catalog
//!
//! Loaded once at startup from a JSON array and never mutated afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::CatalogError;

/// A single puzzle unit
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawClue")]
pub struct Clue {
    pub id: String,
    pub title: String,
    /// Accepted passcodes (compared case-insensitively)
    pub codes: Vec<String>,
    /// Body shown once unlocked
    pub text: String,
    /// Answer disclosed by the reveal gate
    pub answer: Option<String>,
    /// When the answer becomes revealable
    pub reveal_at: Option<DateTime<Utc>>,
}

/// Wire shape of a clue record
#[derive(Deserialize)]
struct RawClue {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    codes: Vec<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    reveal_at: Option<String>,
}

impl From<RawClue> for Clue {
    fn from(raw: RawClue) -> Self {
        let reveal_at = raw.reveal_at.as_deref().and_then(|s| {
            let parsed = parse_reveal_at(s);
            if parsed.is_none() {
                log::warn!("Clue {}: ignoring unparseable reveal_at {:?}", raw.id, s);
            }
            parsed
        });

        Self {
            id: raw.id,
            title: raw.title,
            codes: raw.codes,
            text: raw.text,
            answer: raw.answer.filter(|a| !a.is_empty()),
            reveal_at,
        }
    }
}

impl Clue {
    pub fn new(id: impl Into<String>, title: impl Into<String>, codes: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            codes: codes.iter().map(|c| c.to_string()).collect(),
            text: String::new(),
            answer: None,
            reveal_at: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Attach a time-gated answer
    pub fn with_reveal(mut self, answer: impl Into<String>, reveal_at: DateTime<Utc>) -> Self {
        self.answer = Some(answer.into());
        self.reveal_at = Some(reveal_at);
        self
    }

    /// Answer and reveal time, when the clue carries both
    pub fn gated_answer(&self) -> Option<(&str, DateTime<Utc>)> {
        match (&self.answer, self.reveal_at) {
            (Some(answer), Some(at)) => Some((answer.as_str(), at)),
            _ => None,
        }
    }
}

/// Parse a reveal timestamp.
///
/// Accepts RFC 3339, offset-less `YYYY-MM-DDTHH:MM[:SS[.fff]]` read in the
/// player's local time zone, and a bare `YYYY-MM-DD` read as UTC midnight.
/// A local time skipped by a DST jump does not parse.
pub fn parse_reveal_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Append a cache-busting query parameter to a catalog URL
pub fn cache_busted_url(base: &str, now_millis: i64) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{now_millis}")
}

/// Ordered, id-unique sequence of clues
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    clues: Vec<Clue>,
}

impl Catalog {
    pub fn new(clues: Vec<Clue>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for clue in &clues {
            if !seen.insert(clue.id.as_str()) {
                return Err(CatalogError::DuplicateId(clue.id.clone()));
            }
        }
        Ok(Self { clues })
    }

    /// Parse the JSON array served as `clues.json`
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let clues: Vec<Clue> = serde_json::from_str(json)?;
        let catalog = Self::new(clues)?;
        log::info!("Loaded catalog with {} clues", catalog.len());
        Ok(catalog)
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn get(&self, id: &str) -> Option<&Clue> {
        self.clues.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }
}
