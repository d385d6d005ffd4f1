//! The single persistence service over a [`KeyValueStore`]
//!
//! Every value is JSON-encoded under one of the [`keys`]. Reads are fail-soft:
//! an entry that does not parse is logged, removed and treated as absent, so a
//! corrupt slice falls back to its default without affecting the others.
//! Writes are fire-and-forget; failures are logged and reported as `false`.

use crate::core::config::ViewerConfig;
use crate::storage::{progress::ProgressStore, store::KeyValueStore};
use serde::{de::DeserializeOwned, Serialize};

/// Storage keys
pub mod keys {
    pub const USER_PROGRESS: &str = "shipUserProgress";
    pub const MARKER_SIZE: &str = "shipMarkerSize";
    pub const LAST_SELECTED_SCENARIO: &str = "lastSelectedScenario";
    pub const SCENARIOS_EXPANDED: &str = "shipScenariosExpanded";
    pub const EQUIPMENT_EXPANDED: &str = "shipEquipmentExpanded";
    pub const LAST_CATEGORY: &str = "shipLastCategory";
    pub const APP_VERSION: &str = "appVersion";
}

/// What [`Persistence::initialize`] found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageState {
    /// No stored version or a different one: storage was wiped
    Fresh,
    /// Stored version matched; saved state may be loaded
    Restored,
}

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("keys", &self.store.keys())
            .finish()
    }
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Compare the stored app version with `version`; on mismatch clear every
    /// key and record the new version.
    pub fn initialize(&mut self, version: &str) -> StorageState {
        let stored: Option<String> = self.load(keys::APP_VERSION);
        if stored.as_deref() == Some(version) {
            log::debug!("storage matches app version {}", version);
            return StorageState::Restored;
        }

        log::info!(
            "app version changed ({} -> {}), clearing stored state",
            stored.as_deref().unwrap_or("none"),
            version
        );
        self.reset(version);
        StorageState::Fresh
    }

    /// Clear everything and stamp `version`
    pub fn reset(&mut self, version: &str) {
        if let Err(e) = self.store.clear() {
            log::error!("failed to clear storage: {}", e);
        }
        self.save(keys::APP_VERSION, &version);
    }

    /// Read and decode `key`; corrupt entries are removed and read as `None`
    pub fn load<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding malformed stored value for {}: {}", key, e);
                if let Err(e) = self.store.remove(key) {
                    log::error!("failed to remove {}: {}", key, e);
                }
                None
            }
        }
    }

    /// Encode and write `value` under `key`
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        let result: crate::Result<()> = serde_json::to_string(value)
            .map_err(Into::into)
            .and_then(|json| self.store.set(key, &json));

        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to save {}: {}", key, e);
                false
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to remove {}: {}", key, e);
                false
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.get(key).is_some()
    }

    pub fn load_progress(&mut self) -> ProgressStore {
        self.load(keys::USER_PROGRESS).unwrap_or_default()
    }

    pub fn save_progress(&mut self, progress: &ProgressStore) -> bool {
        self.save(keys::USER_PROGRESS, progress)
    }

    /// Stored marker size clamped into the configured range, or the default
    pub fn load_marker_size(&mut self, config: &ViewerConfig) -> u32 {
        self.load::<u32>(keys::MARKER_SIZE)
            .map(|size| config.clamp_marker_size(size))
            .unwrap_or(config.default_marker_size)
    }

    pub fn save_marker_size(&mut self, size: u32) -> bool {
        self.save(keys::MARKER_SIZE, &size)
    }

    pub fn load_last_scenario(&mut self) -> Option<String> {
        self.load(keys::LAST_SELECTED_SCENARIO)
    }

    pub fn save_last_scenario(&mut self, id: &str) -> bool {
        self.save(keys::LAST_SELECTED_SCENARIO, id)
    }

    pub fn load_flag(&mut self, key: &str, default: bool) -> bool {
        self.load(key).unwrap_or(default)
    }

    pub fn save_flag(&mut self, key: &str, value: bool) -> bool {
        self.save(key, &value)
    }

    pub fn load_last_category(&mut self) -> Option<String> {
        self.load(keys::LAST_CATEGORY)
    }

    pub fn save_last_category(&mut self, category: Option<&str>) -> bool {
        match category {
            Some(category) => self.save(keys::LAST_CATEGORY, category),
            None => self.remove(keys::LAST_CATEGORY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::MemoryStore;

    fn persistence() -> (Persistence, MemoryStore) {
        let store = MemoryStore::new();
        (Persistence::new(Box::new(store.clone())), store)
    }

    #[test]
    fn test_fresh_then_restored() {
        let (mut persistence, store) = persistence();
        assert_eq!(persistence.initialize("1.0.1"), StorageState::Fresh);
        assert_eq!(store.get(keys::APP_VERSION).as_deref(), Some("\"1.0.1\""));
        assert_eq!(persistence.initialize("1.0.1"), StorageState::Restored);
    }

    #[test]
    fn test_version_bump_clears_everything() {
        let (mut persistence, mut store) = persistence();
        store.set(keys::APP_VERSION, "\"0.9.0\"").unwrap();
        store.set(keys::MARKER_SIZE, "40").unwrap();
        store.set("somethingElse", "1").unwrap();

        assert_eq!(persistence.initialize("1.0.1"), StorageState::Fresh);
        assert_eq!(store.keys(), vec![keys::APP_VERSION.to_string()]);
    }

    #[test]
    fn test_corrupt_entry_falls_back_and_is_removed() {
        let (mut persistence, mut store) = persistence();
        store.set(keys::USER_PROGRESS, "{ broken").unwrap();
        store.set(keys::MARKER_SIZE, "30").unwrap();

        assert!(persistence.load_progress().is_empty());
        assert!(!persistence.contains(keys::USER_PROGRESS));
        assert_eq!(persistence.load_marker_size(&ViewerConfig::default()), 30);
    }

    #[test]
    fn test_marker_size_is_clamped() {
        let (mut persistence, mut store) = persistence();
        let config = ViewerConfig::default();
        assert_eq!(persistence.load_marker_size(&config), 24);

        store.set(keys::MARKER_SIZE, "400").unwrap();
        assert_eq!(persistence.load_marker_size(&config), 48);
    }

    #[test]
    fn test_typed_values_round_trip() {
        let (mut persistence, _store) = persistence();
        assert!(persistence.save_last_scenario("h2deck"));
        assert!(persistence.save_flag(keys::SCENARIOS_EXPANDED, false));
        assert!(persistence.save_last_category(Some("halifax")));

        assert_eq!(persistence.load_last_scenario().as_deref(), Some("h2deck"));
        assert!(!persistence.load_flag(keys::SCENARIOS_EXPANDED, true));
        assert!(persistence.load_flag(keys::EQUIPMENT_EXPANDED, true));
        assert_eq!(persistence.load_last_category().as_deref(), Some("halifax"));

        persistence.save_last_category(None);
        assert_eq!(persistence.load_last_category(), None);
    }
}
