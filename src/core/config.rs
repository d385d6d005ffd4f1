//! Configuration for the viewer, persistence and asset cache
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes. `AppConfig::load` resolves the file from an explicit path or the
//! `SHIPSPOT_CONFIG` environment variable and falls back to defaults when no
//! file exists.

use crate::core::constants::*;
use crate::{Result, ShipSpotError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "SHIPSPOT_CONFIG";

/// Zoom, pan and marker settings for the image viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub wheel_sensitivity: f64,
    pub zoom_step: f64,
    pub answer_overlay_opacity: f32,
    pub markers_opacity: f32,
    pub default_marker_size: u32,
    pub min_marker_size: u32,
    pub max_marker_size: u32,
    pub reselect_delay_ms: u64,
}

impl ViewerConfig {
    /// Clamp a marker size preference into the allowed slider range
    pub fn clamp_marker_size(&self, size: u32) -> u32 {
        size.clamp(self.min_marker_size, self.max_marker_size)
    }

    pub fn reselect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reselect_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ShipSpotError::Config(format!(
                "scale range {}..{} is invalid",
                self.min_scale, self.max_scale
            ))
            .into());
        }
        if self.zoom_step <= 1.0 {
            return Err(ShipSpotError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            ))
            .into());
        }
        if !(self.min_marker_size <= self.default_marker_size
            && self.default_marker_size <= self.max_marker_size)
        {
            return Err(ShipSpotError::Config(format!(
                "default marker size {} is outside {}..={}",
                self.default_marker_size, self.min_marker_size, self.max_marker_size
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            zoom_step: BUTTON_ZOOM_FACTOR,
            answer_overlay_opacity: ANSWER_OVERLAY_OPACITY,
            markers_opacity: MARKERS_OPACITY,
            default_marker_size: DEFAULT_MARKER_SIZE,
            min_marker_size: MIN_MARKER_SIZE,
            max_marker_size: MAX_MARKER_SIZE,
            reselect_delay_ms: EQUIPMENT_RESELECT_DELAY_MS,
        }
    }
}

/// Versioned response cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCacheConfig {
    pub name_prefix: String,
    pub version: String,
    pub capacity: usize,
    /// Requests stored when the cache is installed
    pub precache: Vec<String>,
    /// Served for navigation requests when the network is unavailable
    pub offline_page: String,
}

impl AssetCacheConfig {
    /// Name of the cache owned by the current version
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.name_prefix, self.version)
    }
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            name_prefix: CACHE_NAME_PREFIX.to_string(),
            version: CACHE_VERSION.to_string(),
            capacity: DEFAULT_ASSET_CACHE_CAPACITY,
            precache: vec!["/".to_string(), "/index.html".to_string()],
            offline_page: "/index.html".to_string(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Stored alongside progress; a different value wipes storage on start
    pub app_version: String,
    /// Cache-busting token appended to image URLs; `None` uses the start time
    pub build_version: Option<String>,
    /// JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Directory or http(s) base URL that scenario image paths are resolved against
    pub asset_root: String,
    /// Optional JSON scenario table replacing the built-in catalog
    pub scenarios_path: Option<PathBuf>,
    pub viewer: ViewerConfig,
    pub cache: AssetCacheConfig,
}

impl AppConfig {
    /// Parse a config from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a malformed file is an error
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text).map_err(|e| {
            ShipSpotError::Config(format!("{}: {}", path.as_ref().display(), e)).into()
        })
    }

    /// Resolve the config from `path`, then `SHIPSPOT_CONFIG`, then defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) if path.exists() => {
                log::info!("loading config from {}", path.display());
                Self::from_file(&path)
            }
            Some(path) => {
                log::info!("config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// The cache-busting token, defaulting to the current unix time in seconds
    pub fn resolved_build_version(&self) -> String {
        self.build_version.clone().unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
                .to_string()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_version.trim().is_empty() {
            return Err(ShipSpotError::Config("app_version must not be empty".into()).into());
        }
        if self.cache.capacity == 0 {
            return Err(ShipSpotError::Config("cache capacity must be at least 1".into()).into());
        }
        self.viewer.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_version: APP_VERSION.to_string(),
            build_version: None,
            storage_path: PathBuf::from("shipspot-storage.json"),
            asset_root: "public".to_string(),
            scenarios_path: None,
            viewer: ViewerConfig::default(),
            cache: AssetCacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = AppConfig::default();
        assert_eq!(config.app_version, APP_VERSION);
        assert_eq!(config.viewer.min_scale, 1.0);
        assert_eq!(config.viewer.max_scale, 4.0);
        assert_eq!(config.viewer.default_marker_size, 24);
        assert_eq!(config.cache.cache_name(), "shipspot-v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{ "app_version": "2.0.0", "viewer": { "max_scale": 6.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.app_version, "2.0.0");
        assert_eq!(config.viewer.max_scale, 6.0);
        assert_eq!(config.viewer.min_scale, 1.0);
        assert_eq!(config.cache.version, "v1");
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(AppConfig::from_json(r#"{ "viewer": { "min_scale": 5.0 } }"#).is_err());
        assert!(AppConfig::from_json(r#"{ "viewer": { "default_marker_size": 100 } }"#).is_err());
        assert!(AppConfig::from_json(r#"{ "viewer": { "zoom_step": 1.0 } }"#).is_err());
        assert!(AppConfig::from_json(r#"{ "cache": { "capacity": 0 } }"#).is_err());
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("shipspot-config-that-does-not-exist.json");
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_marker_size_clamp() {
        let viewer = ViewerConfig::default();
        assert_eq!(viewer.clamp_marker_size(4), 16);
        assert_eq!(viewer.clamp_marker_size(30), 30);
        assert_eq!(viewer.clamp_marker_size(200), 48);
    }

    #[test]
    fn test_explicit_build_version_wins() {
        let config = AppConfig {
            build_version: Some("build-7".into()),
            ..AppConfig::default()
        };
        assert_eq!(config.resolved_build_version(), "build-7");
        assert!(!AppConfig::default().resolved_build_version().is_empty());
    }
}
