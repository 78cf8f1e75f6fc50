//! # Filesystem-backed session storage
//!
//! [`FileStorage`] is the [`SessionStorage`] used by native builds. Each key is a
//! single JSON file inside a base directory:
//!
//! ```text
//! <base_dir>/
//! └── <key>.json
//! ```
//!
//! Writes go to a sibling temporary file first and are then renamed over the
//! target, so a reader never observes a half-written snapshot.
//!
//! ## Platform data directories
//!
//! Callers usually pass `dirs::data_dir().join("tenant-notes")`:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/tenant-notes/` |
//! | Linux | `~/.local/share/tenant-notes/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\tenant-notes\` |

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::{SessionStorage, StorageError};

/// Filesystem-backed SessionStorage for desktop builds.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base.join(format!(".{key}.json.tmp"))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.base)?;
        let temp = self.temp_path(key);
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, self.entry_path(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session};
    use crate::session_store::SessionStore;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("tenant_notes_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let store = SessionStore::new(FileStorage::new(dir.clone()));
        let session = Session::new("Ada", Role::Admin).with_email("ada@acme.test");
        store.save(&session).unwrap();

        // Re-open from same directory
        let reopened = SessionStore::new(FileStorage::new(dir.clone()));
        assert_eq!(reopened.load(), Some(session));
        assert!(!dir.join(".user.json.tmp").exists());

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert!(store.load().is_none());

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_reads_as_absent() {
        let dir = std::env::temp_dir().join(format!("tenant_notes_missing_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let storage = FileStorage::new(dir);
        assert!(storage.read("user").unwrap().is_none());
        storage.remove("user").unwrap();
    }
}
