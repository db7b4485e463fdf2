//! Error types for the hunt core
//!
//! Recoverable conditions (wrong passcode, early reveal, corrupt save) are
//! modeled as ordinary return values; only genuine failures live here.

use thiserror::Error;

/// Errors raised by [`crate::Hunt`] operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuntError {
    /// Action referenced a clue id that is not in the catalog
    #[error("unknown clue id: {0}")]
    UnknownClue(String),
}

/// Errors raised while loading the clue catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed clue catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate clue id in catalog: {0}")]
    DuplicateId(String),
    #[error("failed to fetch clue catalog: {0}")]
    Fetch(String),
}

/// Errors raised while writing progress
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress encode failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
