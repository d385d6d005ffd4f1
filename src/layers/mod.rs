//! What the viewer draws: scenario images and marker glyphs

pub mod image;
pub mod marker;

pub use self::image::{DecodedImage, ImageSlot, ImageState, ScenarioImages};
pub use self::marker::{GlyphLayout, Marker, MarkerGlyph, MarkerId};
