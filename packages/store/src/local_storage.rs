//! # Browser `localStorage` session storage
//!
//! [`LocalStorage`] is the [`SessionStorage`] used on the web platform. The
//! snapshot lives under a single well-known key of `window.localStorage`, the
//! same slot the JavaScript client used, so sessions survive an upgrade.
//!
//! ## Error handling
//!
//! A missing `window` or a disabled storage area (private browsing, sandboxed
//! iframes) is reported as [`StorageError::Unavailable`]. Callers treat an
//! unreadable store as "signed out".

use web_sys::Storage;

use crate::storage::{SessionStorage, StorageError};

/// `window.localStorage`-backed SessionStorage for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn area(&self) -> Result<Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SessionStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.area()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}
