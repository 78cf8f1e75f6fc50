pub mod config;
pub mod models;
pub mod session_store;
pub mod snapshot;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorage;

pub use config::ClientConfig;
pub use models::{Role, Session, UnknownRole};
pub use session_store::{SessionStore, SESSION_KEY};
pub use snapshot::SnapshotError;
pub use storage::{SessionStorage, StorageError};
