//! Persisted state: key-value backends, the persistence service and marker progress

pub mod persistence;
pub mod progress;
pub mod store;

pub use persistence::{keys, Persistence, StorageState};
pub use progress::ProgressStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};

#[cfg(feature = "wasm")]
pub use store::WebStorage;
