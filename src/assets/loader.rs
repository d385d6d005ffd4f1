//! Cache strategies over a fetcher, and the background image loader

use crate::assets::{
    cache::{AssetCache, CacheStorage},
    fetcher::{AssetFetcher, AssetRequest, AssetResponse, RequestKind},
};
use crate::core::config::AssetCacheConfig;
use crate::{Result, ShipSpotError};
use futures::future::join_all;
use std::sync::Arc;

/// Serves requests network-first and keeps a versioned cache for when the network fails.
///
/// * Navigation: network, falling back to the cached page or the offline page.
/// * Image: network with caching disabled, refreshing the cache on 200; cache on failure.
/// * Other: network, caching 200 responses; cache on failure.
#[derive(Clone)]
pub struct CachingFetcher {
    fetcher: Arc<dyn AssetFetcher>,
    storage: CacheStorage,
    config: AssetCacheConfig,
}

impl std::fmt::Debug for CachingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingFetcher")
            .field("cache", &self.config.cache_name())
            .field("storage", &self.storage)
            .finish()
    }
}

impl CachingFetcher {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, storage: CacheStorage, config: AssetCacheConfig) -> Self {
        Self {
            fetcher,
            storage,
            config,
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// The cache owned by the current version
    pub fn cache(&self) -> AssetCache {
        self.storage.open(&self.config.cache_name())
    }

    /// Fetch the precache list and store it. All entries are stored or none are.
    pub async fn install(&self) -> Result<usize> {
        let requests: Vec<AssetRequest> = self
            .config
            .precache
            .iter()
            .map(|url| AssetRequest::new(url.as_str()))
            .collect();

        let responses = join_all(requests.iter().map(|r| self.fetcher.fetch(r))).await;

        let mut fetched = Vec::with_capacity(requests.len());
        for (request, response) in requests.iter().zip(responses) {
            match response {
                Ok(response) if response.is_cacheable() => fetched.push((request, response)),
                Ok(response) => {
                    return Err(ShipSpotError::Asset(format!(
                        "precache of {} returned {}",
                        request.url, response.status
                    ))
                    .into())
                }
                Err(e) => {
                    return Err(
                        ShipSpotError::Asset(format!("precache of {} failed: {}", request.url, e)).into(),
                    )
                }
            }
        }

        let cache = self.cache();
        let count = fetched.len();
        for (request, response) in fetched {
            cache.put(&request.url, response);
        }
        log::info!("installed {} with {} precached assets", cache.name(), count);
        Ok(count)
    }

    /// Drop caches left behind by previous versions
    pub fn activate(&self) -> Vec<String> {
        self.storage.activate(&self.config.cache_name())
    }

    pub async fn fetch_url(&self, url: &str) -> Result<AssetResponse> {
        self.fetch(&AssetRequest::new(url)).await
    }

    pub async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.cache().put(&request.url, response.clone());
                }
                Ok(response)
            }
            Err(e) => {
                log::warn!("network fetch of {} failed: {}", request.url, e);
                self.fallback(request).ok_or(e)
            }
        }
    }

    fn fallback(&self, request: &AssetRequest) -> Option<AssetResponse> {
        let cached = self.storage.match_request(&request.url);
        let response = match request.kind {
            RequestKind::Navigation => {
                cached.or_else(|| self.storage.match_request(&self.config.offline_page))
            }
            RequestKind::Image | RequestKind::Other => cached,
        };

        if response.is_some() {
            log::debug!("serving {} from cache", request.url);
        }
        response
    }
}

#[cfg(feature = "tokio-runtime")]
pub use background::{AssetLoader, AssetResult};

#[cfg(feature = "tokio-runtime")]
mod background {
    use super::CachingFetcher;
    use crate::layers::image::DecodedImage;
    use crate::prelude::HashSet;
    use crate::runtime;
    use crossbeam_channel::{unbounded, Receiver, Sender};
    use std::sync::Arc;

    /// A finished image load
    #[derive(Debug, Clone)]
    pub struct AssetResult {
        pub url: String,
        pub result: std::result::Result<Arc<DecodedImage>, String>,
    }

    /// Loads and decodes images on the async runtime, handing results back over a channel
    pub struct AssetLoader {
        fetcher: Arc<CachingFetcher>,
        sender: Sender<AssetResult>,
        results: Receiver<AssetResult>,
        in_flight: HashSet<String>,
    }

    impl AssetLoader {
        pub fn new(fetcher: Arc<CachingFetcher>) -> Self {
            let (sender, results) = unbounded();
            Self {
                fetcher,
                sender,
                results,
                in_flight: HashSet::default(),
            }
        }

        /// Install the precache and purge old caches in the background
        pub fn prepare_cache(&self) {
            let fetcher = self.fetcher.clone();
            runtime::spawn(async move {
                if let Err(e) = fetcher.install().await {
                    log::warn!("asset precache skipped: {}", e);
                }
                fetcher.activate();
            });
        }

        /// Start loading `url` unless it is already in flight. Returns whether
        /// a load was started.
        pub fn request(&mut self, url: &str) -> bool {
            if !self.in_flight.insert(url.to_string()) {
                return false;
            }

            let fetcher = self.fetcher.clone();
            let sender = self.sender.clone();
            let task_url = url.to_string();
            let spawned = runtime::spawn(async move {
                let result = load_image(&fetcher, &task_url).await;
                let _ = sender.send(AssetResult {
                    url: task_url,
                    result,
                });
            });

            if spawned.is_none() {
                self.abandon(url, "no async runtime available to load assets");
                return false;
            }
            true
        }

        /// Drop `url` from the in-flight set and report it as failed on the next poll
        fn abandon(&mut self, url: &str, reason: &str) {
            log::error!("{}: {}", reason, url);
            self.in_flight.remove(url);
            let _ = self.sender.send(AssetResult {
                url: url.to_string(),
                result: Err(reason.to_string()),
            });
        }

        /// Results that arrived since the last poll
        pub fn poll(&mut self) -> Vec<AssetResult> {
            let results: Vec<AssetResult> = self.results.try_iter().collect();
            for result in &results {
                self.in_flight.remove(&result.url);
            }
            results
        }

        pub fn is_idle(&self) -> bool {
            self.in_flight.is_empty()
        }
    }

    async fn load_image(
        fetcher: &CachingFetcher,
        url: &str,
    ) -> std::result::Result<Arc<DecodedImage>, String> {
        let response = fetcher.fetch_url(url).await.map_err(|e| e.to_string())?;
        if !response.is_success() {
            return Err(format!("HTTP {}", response.status));
        }
        DecodedImage::decode(&response.body)
            .map(Arc::new)
            .map_err(|e| e.to_string())
    }

}
