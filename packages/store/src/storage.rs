//! Key/value persistence used by [`crate::SessionStore`].
//!
//! Browser `localStorage` is synchronous, so this trait is too: a screen can
//! consult the stored session before its first render without awaiting.

/// Failure of the underlying storage medium.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string storage keyed by name.
pub trait SessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key` in a single step.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
