use super::ProgressStore;
use crate::error::StoreError;

/// In-memory store, for tests and storage-less environments
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing raw record
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Some(raw.into()),
            writes: 0,
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of writes performed so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ProgressStore for MemoryStore {
    fn read_record(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.clone())
    }

    fn write_record(&mut self, json: &str) -> Result<(), StoreError> {
        self.record = Some(json.to_string());
        self.writes += 1;
        Ok(())
    }
}
