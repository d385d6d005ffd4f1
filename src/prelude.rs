//! Prelude module for common shipspot types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use shipspot::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{AppConfig, AssetCacheConfig, ViewerConfig},
    geo::Point,
    viewport::{ImageFit, Transform, Viewport},
};

pub use crate::data::{
    categories::Category,
    equipment::{Equipment, EquipmentIcon, EquipmentRegistry},
    scenarios::{CategoryGroup, Scenario, ScenarioCatalog},
};

pub use crate::input::{
    events::{InputEvent, KeyCode, MouseButton},
    handler::{
        DragState, InputHandler, ViewerAction, ViewerCursor, ViewportCommand, ViewportHandle,
    },
};

pub use crate::layers::{
    image::{DecodedImage, ImageSlot, ImageState, ScenarioImages},
    marker::{GlyphLayout, Marker, MarkerGlyph, MarkerId},
};

pub use crate::navigator::{Navigator, NavigatorCommand};

pub use crate::session::QuizSession;

pub use crate::storage::{
    persistence::{keys, Persistence, StorageState},
    progress::ProgressStore,
    store::{FileStore, KeyValueStore, MemoryStore},
};

pub use crate::assets::{
    cache::{AssetCache, CacheStorage, CachedResponse},
    fetcher::{
        fetcher_for_root, AssetFetcher, AssetRequest, AssetResponse, FileFetcher, HttpFetcher,
        RequestKind,
    },
    loader::CachingFetcher,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::assets::loader::{AssetLoader, AssetResult};

#[cfg(feature = "egui")]
pub use crate::ui::{
    sidebar::{Sidebar, SidebarAction},
    style::ViewerStyle,
    widget::{ImageTextures, ImageViewer},
    UiQuizExt,
};

pub use crate::{Error as ShipSpotError, Result};

pub use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
