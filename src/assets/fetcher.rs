//! Requests, responses and the network/disk fetchers behind the asset cache

use crate::{Result, ShipSpotError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Shared async HTTP client for asset fetching
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("shipspot/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default http client: {}", e);
            reqwest::Client::new()
        })
});

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "svg"];

/// How the cache layer treats a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A page load; falls back to the offline page
    Navigation,
    /// Always fetched fresh, refreshing the cache
    Image,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub url: String,
    pub kind: RequestKind,
}

impl AssetRequest {
    /// Build a request, inferring its kind from the URL path
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = Self::infer_kind(&url);
        Self { url, kind }
    }

    pub fn with_kind(url: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    fn infer_kind(url: &str) -> RequestKind {
        let path = url_path(url);
        let extension = path
            .rsplit('/')
            .next()
            .and_then(|file| file.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => RequestKind::Image,
            Some("html") => RequestKind::Navigation,
            _ if path.is_empty() || path.ends_with('/') => RequestKind::Navigation,
            _ => RequestKind::Other,
        }
    }

    /// The URL without query string or fragment
    pub fn path(&self) -> &str {
        url_path(&self.url)
    }
}

/// Path part of a URL: scheme and host removed, query and fragment cut
fn url_path(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    match without_query.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => without_query,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Arc<Vec<u8>>,
}

impl AssetResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: None,
            body: Arc::new(body),
        }
    }

    pub fn ok(body: Vec<u8>) -> Self {
        Self::new(200, body)
    }

    pub fn not_found() -> Self {
        Self::new(404, Vec::new())
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Only a plain 200 is stored in the cache
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where assets come from when the cache is bypassed.
///
/// `Err` means the source could not be reached at all; an HTTP error status is
/// still an `Ok` response.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse>;
}

/// Join a relative asset path onto a base URL or directory; absolute URLs pass through
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fetches over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let url = resolve_url(&self.base_url, &request.url);
        let mut builder = HTTP_CLIENT.get(&url);
        if request.kind == RequestKind::Image {
            builder = builder.header(reqwest::header::CACHE_CONTROL, "no-store");
        }

        let response = builder.send().await.map_err(ShipSpotError::from)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(ShipSpotError::from)?;

        log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(AssetResponse {
            status,
            content_type,
            body: Arc::new(body.to_vec()),
        })
    }
}

/// Serves assets from a directory; missing files are 404 responses
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path under `root` for a request; `None` if it would leave `root`
    fn file_path(&self, request: &AssetRequest) -> Option<PathBuf> {
        let relative = Path::new(request.path().trim_start_matches('/'));
        let inside_root = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside_root {
            return None;
        }

        if relative.as_os_str().is_empty() {
            Some(self.root.join("index.html"))
        } else {
            Some(self.root.join(relative))
        }
    }
}

async fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    #[cfg(feature = "tokio-runtime")]
    {
        tokio::fs::read(path).await
    }
    #[cfg(not(feature = "tokio-runtime"))]
    {
        std::fs::read(path)
    }
}

#[async_trait]
impl AssetFetcher for FileFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let Some(path) = self.file_path(request) else {
            log::warn!("refusing asset path outside the root: {}", request.url);
            return Ok(AssetResponse::new(403, Vec::new()));
        };
        match read_file(&path).await {
            Ok(bytes) => Ok(AssetResponse::ok(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("asset {} not found", path.display());
                Ok(AssetResponse::not_found())
            }
            Err(e) => Err(ShipSpotError::Io(e).into()),
        }
    }
}

/// Pick the fetcher for an asset root: http(s) URLs go over the network, anything else is a directory
pub fn fetcher_for_root(root: &str) -> Arc<dyn AssetFetcher> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Arc::new(HttpFetcher::new(root))
    } else {
        Arc::new(FileFetcher::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_inference() {
        assert_eq!(AssetRequest::new("/").kind, RequestKind::Navigation);
        assert_eq!(AssetRequest::new("/index.html").kind, RequestKind::Navigation);
        assert_eq!(
            AssetRequest::new("images/Halifax/1Deck.png?v=123").kind,
            RequestKind::Image
        );
        assert_eq!(AssetRequest::new("https://cdn.example/a/B.JPG").kind, RequestKind::Image);
        assert_eq!(AssetRequest::new("https://cdn.example").kind, RequestKind::Navigation);
        assert_eq!(AssetRequest::new("/assets/app.js").kind, RequestKind::Other);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url("public", "images/a.png"), "public/images/a.png");
        assert_eq!(resolve_url("https://x.org/", "/a.png"), "https://x.org/a.png");
        assert_eq!(resolve_url("public", "https://y.org/b.png"), "https://y.org/b.png");
    }

    #[tokio::test]
    async fn test_file_fetcher_strips_query() {
        let root = std::env::temp_dir().join(format!("shipspot-assets-{}", std::process::id()));
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("images/deck.png"), b"png-bytes").unwrap();

        let fetcher = FileFetcher::new(&root);
        let found = fetcher
            .fetch(&AssetRequest::new("images/deck.png?v=9"))
            .await
            .unwrap();
        assert_eq!(found.status, 200);
        assert_eq!(found.body.as_slice(), b"png-bytes");

        let missing = fetcher.fetch(&AssetRequest::new("/nope.png")).await.unwrap();
        assert_eq!(missing.status, 404);

        std::fs::write(root.with_extension("secret"), b"outside").unwrap();
        let name = root.with_extension("secret");
        let name = name.file_name().unwrap().to_string_lossy();
        let escaped = fetcher
            .fetch(&AssetRequest::new(format!("images/../../{}", name)))
            .await
            .unwrap();
        assert_eq!(escaped.status, 403);
        assert!(escaped.body.is_empty());
        let _ = std::fs::remove_file(root.with_extension("secret"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
