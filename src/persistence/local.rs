use web_sys::Storage;

use super::{PROGRESS_KEY, ProgressStore};
use crate::error::StoreError;

/// Progress kept in `window.localStorage`
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(PROGRESS_KEY)
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        crate::platform::local_storage()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not accessible".into()))
    }
}

impl ProgressStore for LocalStorageStore {
    fn read_record(&self) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn write_record(&mut self, json: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(&self.key, json)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}
