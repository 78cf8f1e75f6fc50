//! # SessionStore: the one owner of the persisted session
//!
//! Every part of the client that needs to know who is signed in goes through a
//! [`SessionStore`]; nothing else touches the storage slot directly. The store
//! wraps any [`SessionStorage`] and a key (default [`SESSION_KEY`]).
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | [`load`](SessionStore::load) | Reads and parses the snapshot. Absent, unreadable or malformed data yields `None`; malformed data is erased on the spot. |
//! | [`save`](SessionStore::save) | Overwrites the snapshot with one storage write. |
//! | [`clear`](SessionStore::clear) | Erases the snapshot. Clearing an absent session succeeds. |
//!
//! There is no expiry: a stored session stays valid until cleared or found
//! malformed. The store makes no network calls.

use tracing::{debug, warn};

use crate::models::Session;
use crate::storage::{SessionStorage, StorageError};

/// Storage key the snapshot lives under.
pub const SESSION_KEY: &str = "user";

/// Process-wide reader/writer of the persisted [`Session`].
#[derive(Clone, Debug)]
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the current session, discarding malformed snapshots.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read session snapshot: {}", e);
                return None;
            }
        };

        match Session::from_json(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding malformed session snapshot: {}", e);
                if let Err(e) = self.clear() {
                    warn!("Failed to erase malformed session snapshot: {}", e);
                }
                None
            }
        }
    }

    /// Replace the stored session wholesale.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let json = session
            .to_json()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        self.storage.write(&self.key, &json)?;
        debug!("Saved session for {} ({})", session.user_name, session.role);
        Ok(())
    }

    /// Erase the stored session.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    pub fn is_signed_in(&self) -> bool {
        self.load().is_some()
    }
}
