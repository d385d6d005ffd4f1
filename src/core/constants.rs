//! Core constants for the viewer, the quiz session and the asset cache.
//! Keeping them in a single place makes it easier to tweak app-wide magic numbers.

/// Version stamped into storage; a mismatch wipes every persisted entry.
pub const APP_VERSION: &str = "1.0.1";

/// The image is never shown smaller than its fitted size.
pub const MIN_SCALE: f64 = 1.0;

/// Maximum zoom factor relative to the fitted image.
pub const MAX_SCALE: f64 = 4.0;

/// Scale change per unit of wheel delta (`scale * (1 + delta * sensitivity)`).
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

/// Multiplier applied by the toolbar zoom buttons.
pub const BUTTON_ZOOM_FACTOR: f64 = 1.2;

/// Opacity of the answer image drawn over the question image.
pub const ANSWER_OVERLAY_OPACITY: f32 = 0.5;

/// Opacity of marker glyphs while the answer overlay is visible.
pub const MARKERS_OPACITY: f32 = 1.0;

/// Marker icon size in pixels before zoom.
pub const DEFAULT_MARKER_SIZE: u32 = 24;
pub const MIN_MARKER_SIZE: u32 = 16;
pub const MAX_MARKER_SIZE: u32 = 48;

/// Padding between a marker icon and its coloured ring.
pub const MARKER_PADDING: f64 = 4.0;

/// Edge length of the marker removal button.
pub const MARKER_REMOVE_BUTTON_SIZE: f64 = 16.0;

/// Delay between deselecting and reselecting equipment after a navigation change.
pub const EQUIPMENT_RESELECT_DELAY_MS: u64 = 300;

/// Asset cache naming: `<prefix>-<version>`.
pub const CACHE_NAME_PREFIX: &str = "shipspot";
pub const CACHE_VERSION: &str = "v1";

/// Maximum number of responses kept per asset cache.
pub const DEFAULT_ASSET_CACHE_CAPACITY: usize = 128;

/// Query parameter used to bust caches on image URLs.
pub const CACHE_BUST_PARAM: &str = "v";
