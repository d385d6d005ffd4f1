//! # shipspot
//!
//! A deck-plan marker quiz. A scenario shows a ship compartment image; the user
//! picks an equipment type, clicks where that equipment lives, and can overlay
//! the answer image to check the result.
//!
//! The library is split so everything except drawing runs without a GUI:
//! the viewport transform engine, input state machine, navigator, progress
//! store and asset cache are plain Rust, and the `egui` feature adds the
//! widgets that render them.

pub mod assets;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod navigator;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod session;
pub mod storage;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{AppConfig, AssetCacheConfig, ViewerConfig},
    geo::Point,
    viewport::{ImageFit, Transform, Viewport},
};

pub use data::{
    categories::Category,
    equipment::{Equipment, EquipmentIcon, EquipmentRegistry},
    scenarios::{CategoryGroup, Scenario, ScenarioCatalog},
};

pub use input::{
    events::InputEvent,
    handler::{InputHandler, ViewerAction, ViewportCommand, ViewportHandle},
};

pub use layers::marker::{Marker, MarkerGlyph};

pub use navigator::Navigator;

pub use session::QuizSession;

pub use storage::{
    persistence::{Persistence, StorageState},
    progress::ProgressStore,
    store::{FileStore, KeyValueStore, MemoryStore},
};

pub use assets::{
    cache::{AssetCache, CacheStorage},
    fetcher::{AssetFetcher, AssetRequest, AssetResponse, RequestKind},
    loader::CachingFetcher,
};

#[cfg(feature = "tokio-runtime")]
pub use assets::loader::{AssetLoader, AssetResult};

#[cfg(feature = "egui")]
pub use ui::{ImageTextures, ImageViewer, Sidebar, ViewerStyle};

/// Install `env_logger`, defaulting to `info` for this crate; `RUST_LOG` overrides
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("shipspot=info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("logger already installed: {}", e);
    }
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ShipSpotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Unknown equipment: {0}")]
    UnknownEquipment(String),
}

/// Error type alias for convenience
pub type Error = ShipSpotError;
