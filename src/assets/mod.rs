//! Asset fetching with a versioned offline cache

pub mod cache;
pub mod fetcher;
pub mod loader;

pub use cache::{AssetCache, CacheStorage, CachedResponse};
pub use fetcher::{
    fetcher_for_root, resolve_url, AssetFetcher, AssetRequest, AssetResponse, FileFetcher,
    HttpFetcher, RequestKind,
};
pub use loader::CachingFetcher;

#[cfg(feature = "tokio-runtime")]
pub use loader::{AssetLoader, AssetResult};
