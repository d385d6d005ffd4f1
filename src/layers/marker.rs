use crate::{
    core::{
        bounds::Bounds,
        constants::{MARKER_PADDING, MARKER_REMOVE_BUTTON_SIZE},
        geo::Point,
        viewport::Viewport,
    },
    data::equipment::Equipment,
};
use serde::{Deserialize, Serialize};

/// Marker ids are creation timestamps in milliseconds
pub type MarkerId = u64;

/// A user-placed equipment marker at a position relative to the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    /// Percent of image width, 0–100
    pub x: f64,
    /// Percent of image height, 0–100
    pub y: f64,
    pub equipment: Equipment,
}

impl Marker {
    pub fn new(id: MarkerId, x: f64, y: f64, equipment: Equipment) -> Self {
        Self { id, x, y, equipment }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Screen geometry of one marker glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    pub center: Point,
    /// Side length of the icon square
    pub icon_size: f64,
    /// Radius of the coloured disc behind the icon
    pub radius: f64,
    /// Centre of the remove button at the disc's top-right
    pub remove_center: Point,
    pub remove_radius: f64,
}

impl GlyphLayout {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center_and_size(self.center, self.radius * 2.0, self.radius * 2.0)
    }

    /// Whether `point` hits the disc or the remove button
    pub fn contains(&self, point: &Point) -> bool {
        self.center.distance_to(point) <= self.radius || self.hits_remove(point)
    }

    pub fn hits_remove(&self, point: &Point) -> bool {
        self.remove_center.distance_to(point) <= self.remove_radius
    }
}

/// Stateless placement and colouring of marker glyphs
pub struct MarkerGlyph;

impl MarkerGlyph {
    /// Lay out `marker` under the viewport's current transform.
    ///
    /// Glyphs are drawn inside the transformed image, so they grow with zoom.
    pub fn layout(marker: &Marker, viewport: &Viewport, marker_size: u32) -> Option<GlyphLayout> {
        let center = viewport.image_percent_to_screen(marker.position())?;
        let scale = viewport.scale();

        let icon_size = marker_size as f64 * scale;
        let half = marker_size as f64 / 2.0 + MARKER_PADDING;
        let remove_offset = (half - MARKER_PADDING) * scale;

        Some(GlyphLayout {
            center,
            icon_size,
            radius: half * scale,
            remove_center: center.add(&Point::new(remove_offset, -remove_offset)),
            remove_radius: MARKER_REMOVE_BUTTON_SIZE / 2.0 * scale,
        })
    }

    /// The id of the topmost marker whose remove button is under `point`
    pub fn remove_target(
        markers: &[Marker],
        viewport: &Viewport,
        marker_size: u32,
        point: &Point,
    ) -> Option<MarkerId> {
        markers.iter().rev().find_map(|marker| {
            Self::layout(marker, viewport, marker_size)
                .filter(|layout| layout.hits_remove(point))
                .map(|_| marker.id)
        })
    }

    /// Foreground colour of an equipment colour string
    pub fn foreground_rgb(color: &str) -> [u8; 3] {
        parse_color(color).unwrap_or([128, 128, 128])
    }

    /// Translucent disc colour: the equipment colour at 15 % alpha
    pub fn background_rgba(color: &str) -> [u8; 4] {
        match parse_color(color) {
            Some([r, g, b]) => [r, g, b, 38],
            None => [128, 128, 128, 0x1A],
        }
    }
}

/// Parse `#rrggbb`, `#rgb` or one of the named colours the scenario data uses
pub fn parse_color(color: &str) -> Option<[u8; 3]> {
    let color = color.trim();

    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some([short(0)?, short(1)?, short(2)?])
            }
            _ => None,
        };
    }

    match color.to_ascii_lowercase().as_str() {
        "red" => Some([255, 0, 0]),
        "blue" => Some([0, 0, 255]),
        "green" => Some([0, 128, 0]),
        "purple" => Some([128, 0, 128]),
        "orange" => Some([255, 165, 0]),
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::equipment::EquipmentRegistry;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::default();
        viewport.set_container(Point::new(10.0, 20.0), Point::new(400.0, 400.0));
        viewport.set_image_size(Point::new(1000.0, 1000.0));
        viewport
    }

    fn marker(id: MarkerId, x: f64, y: f64) -> Marker {
        let equipment = EquipmentRegistry::standard().get("Halon").cloned().unwrap();
        Marker::new(id, x, y, equipment)
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("#2563eb"), Some([0x25, 0x63, 0xeb]));
        assert_eq!(parse_color("#f00"), Some([255, 0, 0]));
        assert_eq!(parse_color("purple"), Some([128, 0, 128]));
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(MarkerGlyph::background_rgba("#16a34a"), [0x16, 0xa3, 0x4a, 38]);
        assert_eq!(MarkerGlyph::background_rgba("teal")[3], 0x1A);
    }

    #[test]
    fn test_layout_follows_viewport() {
        let mut viewport = viewport();
        let m = marker(1, 50.0, 25.0);

        let layout = MarkerGlyph::layout(&m, &viewport, 24).unwrap();
        assert_eq!(layout.center, Point::new(210.0, 120.0));
        assert_eq!(layout.icon_size, 24.0);
        assert_eq!(layout.radius, 16.0);

        viewport.zoom_by(2.0);
        let zoomed = MarkerGlyph::layout(&m, &viewport, 24).unwrap();
        assert_eq!(zoomed.icon_size, 48.0);
        assert_eq!(zoomed.center, Point::new(210.0, 20.0));
    }

    #[test]
    fn test_remove_target_prefers_topmost() {
        let viewport = viewport();
        let markers = vec![marker(1, 50.0, 50.0), marker(2, 50.0, 50.0), marker(3, 10.0, 10.0)];
        let layout = MarkerGlyph::layout(&markers[0], &viewport, 24).unwrap();

        assert_eq!(
            MarkerGlyph::remove_target(&markers, &viewport, 24, &layout.remove_center),
            Some(2)
        );
        assert_eq!(
            MarkerGlyph::remove_target(&markers, &viewport, 24, &Point::new(400.0, 400.0)),
            None
        );
    }

    #[test]
    fn test_marker_json_shape() {
        let json = serde_json::to_value(marker(7, 1.5, 2.5)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["equipment"]["id"], "Halon");
        assert_eq!(json["equipment"]["icon"], "Wind");
    }
}
