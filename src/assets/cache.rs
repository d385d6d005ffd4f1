//! Named, versioned response caches

use crate::assets::fetcher::AssetResponse;
use crate::prelude::{Arc, HashMap, Instant, Mutex};
use lru::LruCache;
use std::num::NonZeroUsize;

/// A stored response and when it was stored
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub response: AssetResponse,
    pub stored_at: Instant,
}

/// One named cache of responses keyed by request URL
#[derive(Debug, Clone)]
pub struct AssetCache {
    name: String,
    entries: Arc<Mutex<LruCache<String, CachedResponse>>>,
}

impl AssetCache {
    /// Create a cache holding at most `capacity` responses (minimum 1)
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name: name.into(),
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn put(&self, url: &str, response: AssetResponse) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                url.to_string(),
                CachedResponse {
                    response,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn get(&self, url: &str) -> Option<AssetResponse> {
        self.entries
            .lock()
            .ok()?
            .get(url)
            .map(|cached| cached.response.clone())
    }

    pub fn get_entry(&self, url: &str) -> Option<CachedResponse> {
        self.entries.lock().ok()?.peek(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains(url))
            .unwrap_or(false)
    }

    pub fn remove(&self, url: &str) -> bool {
        self.entries
            .lock()
            .map(|mut entries| entries.pop(url).is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

/// All caches by name, shared between clones
#[derive(Debug, Clone)]
pub struct CacheStorage {
    caches: Arc<Mutex<HashMap<String, AssetCache>>>,
    capacity: usize,
}

impl CacheStorage {
    /// `capacity` applies to each cache opened from this storage
    pub fn new(capacity: usize) -> Self {
        Self {
            caches: Arc::new(Mutex::new(HashMap::default())),
            capacity,
        }
    }

    /// Open the cache called `name`, creating it if needed
    pub fn open(&self, name: &str) -> AssetCache {
        match self.caches.lock() {
            Ok(mut caches) => caches
                .entry(name.to_string())
                .or_insert_with(|| AssetCache::new(name, self.capacity))
                .clone(),
            Err(_) => AssetCache::new(name, self.capacity),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.caches
            .lock()
            .map(|caches| caches.contains_key(name))
            .unwrap_or(false)
    }

    /// Cache names, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .caches
            .lock()
            .map(|caches| caches.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn delete(&self, name: &str) -> bool {
        self.caches
            .lock()
            .map(|mut caches| caches.remove(name).is_some())
            .unwrap_or(false)
    }

    /// Look `url` up in every cache, in name order
    pub fn match_request(&self, url: &str) -> Option<AssetResponse> {
        let caches: Vec<AssetCache> = {
            let guard = self.caches.lock().ok()?;
            let mut caches: Vec<AssetCache> = guard.values().cloned().collect();
            caches.sort_by(|a, b| a.name.cmp(&b.name));
            caches
        };
        caches.iter().find_map(|cache| cache.get(url))
    }

    /// Delete every cache except `current`; returns the deleted names
    pub fn activate(&self, current: &str) -> Vec<String> {
        let stale: Vec<String> = self.keys().into_iter().filter(|name| name != current).collect();
        for name in &stale {
            if self.delete(name) {
                log::info!("purged stale asset cache {}", name);
            }
        }
        stale
    }
}
