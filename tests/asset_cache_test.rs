use async_trait::async_trait;
use shipspot::assets::{AssetLoader, AssetResult};
use shipspot::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Serves a directory until switched offline, then fails every request
struct FlakyDisk {
    inner: FileFetcher,
    offline: AtomicBool,
}

#[async_trait]
impl AssetFetcher for FlakyDisk {
    async fn fetch(&self, request: &AssetRequest) -> shipspot::Result<AssetResponse> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ShipSpotError::Asset("network unreachable".into()).into());
        }
        self.inner.fetch(request).await
    }
}

fn asset_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("shipspot-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("images/Halifax")).unwrap();
    std::fs::write(root.join("index.html"), "<html>offline</html>").unwrap();

    let deck = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    deck.save(root.join("images/Halifax/1Deck.png")).unwrap();
    root
}

fn caching_fetcher(root: &PathBuf) -> (Arc<CachingFetcher>, Arc<FlakyDisk>) {
    let disk = Arc::new(FlakyDisk {
        inner: FileFetcher::new(root),
        offline: AtomicBool::new(false),
    });
    let config = AssetCacheConfig::default();
    let fetcher = CachingFetcher::new(disk.clone(), CacheStorage::new(config.capacity), config);
    (Arc::new(fetcher), disk)
}

async fn wait_for(loader: &mut AssetLoader) -> Vec<AssetResult> {
    for _ in 0..200 {
        let results = loader.poll();
        if !results.is_empty() {
            return results;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("asset load did not finish");
}

#[tokio::test]
async fn test_install_precaches_shell() {
    let root = asset_root("install");
    let (fetcher, _disk) = caching_fetcher(&root);

    assert_eq!(fetcher.install().await.unwrap(), 2);
    assert!(fetcher.cache().contains("/"));
    assert!(fetcher.cache().contains("/index.html"));
}

#[tokio::test]
async fn test_offline_navigation_serves_offline_page() {
    let root = asset_root("offline");
    let (fetcher, disk) = caching_fetcher(&root);
    fetcher.install().await.unwrap();

    disk.offline.store(true, Ordering::SeqCst);
    let page = fetcher
        .fetch(&AssetRequest::with_kind("/scenario/h1deck", RequestKind::Navigation))
        .await
        .unwrap();
    assert_eq!(page.body.as_slice(), b"<html>offline</html>");
}

#[tokio::test]
async fn test_loader_decodes_and_survives_going_offline() {
    let root = asset_root("loader");
    let (fetcher, disk) = caching_fetcher(&root);
    let mut loader = AssetLoader::new(fetcher.clone());
    let url = "images/Halifax/1Deck.png?v=42";

    assert!(loader.request(url));
    assert!(!loader.request(url), "duplicate request while in flight");

    let results = wait_for(&mut loader).await;
    assert_eq!(results.len(), 1);
    let image = results[0].result.as_ref().unwrap();
    assert_eq!((image.width, image.height), (3, 2));
    assert!(loader.is_idle());

    // Second load comes from the cache
    disk.offline.store(true, Ordering::SeqCst);
    assert!(loader.request(url));
    let results = wait_for(&mut loader).await;
    assert!(results[0].result.is_ok());

    // Never fetched, so nothing to fall back to
    assert!(loader.request("images/Halifax/2Deck.png"));
    let results = wait_for(&mut loader).await;
    assert!(results[0].result.is_err());
}

#[tokio::test]
async fn test_missing_file_is_not_cached() {
    let root = asset_root("missing");
    let (fetcher, _disk) = caching_fetcher(&root);

    let response = fetcher.fetch_url("images/Halifax/9Deck.png").await.unwrap();
    assert_eq!(response.status, 404);
    assert!(!fetcher.cache().contains("images/Halifax/9Deck.png"));
}

#[tokio::test]
async fn test_activation_purges_old_versions() {
    let root = asset_root("activate");
    let (fetcher, _disk) = caching_fetcher(&root);
    fetcher.storage().open("shipspot-v0").put("/", AssetResponse::ok(b"old".to_vec()));
    fetcher.install().await.unwrap();

    assert_eq!(fetcher.activate(), vec!["shipspot-v0".to_string()]);
    assert_eq!(fetcher.storage().keys(), vec!["shipspot-v1".to_string()]);
}
