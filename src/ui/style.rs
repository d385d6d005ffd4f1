use egui::{Color32, FontId, Stroke};

/// Style configuration for the image viewer and sidebar
#[derive(Debug, Clone)]
pub struct ViewerStyle {
    /// Background behind the deck image
    pub background_color: Color32,
    /// Border around the viewer area
    pub border_stroke: Stroke,
    /// Floating toolbar buttons
    pub toolbar: ToolbarStyle,
    /// Marker glyphs
    pub glyph: GlyphStyle,
    /// "Select a scenario" / "Upload an image" messages
    pub placeholder: PlaceholderStyle,
}

/// Style for the floating toolbar
#[derive(Debug, Clone)]
pub struct ToolbarStyle {
    /// Panel behind the buttons
    pub panel_color: Color32,
    /// Button background
    pub background_color: Color32,
    /// Button background when hovered
    pub hover_color: Color32,
    /// Button background when toggled on (hand tool)
    pub active_color: Color32,
    /// Background of the destructive "Clear All" button
    pub danger_color: Color32,
    /// Icon and label colour
    pub text_color: Color32,
    /// Button border
    pub border_stroke: Stroke,
    /// Square button edge
    pub button_size: f32,
    /// Space between buttons
    pub spacing: f32,
    /// Distance from the bottom edge of the viewer
    pub margin: f32,
    /// Corner rounding
    pub rounding: f32,
}

/// Style for marker glyphs
#[derive(Debug, Clone)]
pub struct GlyphStyle {
    /// Inner ring drawn between the disc and the coloured outline
    pub inner_ring: Stroke,
    /// Width of the coloured outer ring
    pub outer_ring_width: f32,
    /// Remove button fill
    pub remove_color: Color32,
    /// Remove button cross
    pub remove_cross: Stroke,
    /// Shadow under the disc
    pub shadow_color: Color32,
}

/// Style for placeholder text
#[derive(Debug, Clone)]
pub struct PlaceholderStyle {
    pub text_color: Color32,
    pub font_id: FontId,
}

impl Default for ViewerStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(243, 244, 246),
            border_stroke: Stroke::new(1.0, Color32::from_gray(210)),
            toolbar: ToolbarStyle::default(),
            glyph: GlyphStyle::default(),
            placeholder: PlaceholderStyle::default(),
        }
    }
}

impl Default for ToolbarStyle {
    fn default() -> Self {
        Self {
            panel_color: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            background_color: Color32::WHITE,
            hover_color: Color32::from_gray(235),
            active_color: Color32::from_rgb(219, 234, 254),
            danger_color: Color32::from_rgb(220, 38, 38),
            text_color: Color32::from_gray(40),
            border_stroke: Stroke::new(1.0, Color32::from_gray(200)),
            button_size: 32.0,
            spacing: 6.0,
            margin: 16.0,
            rounding: 6.0,
        }
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            inner_ring: Stroke::new(2.0, Color32::WHITE),
            outer_ring_width: 2.0,
            remove_color: Color32::from_rgb(239, 68, 68),
            remove_cross: Stroke::new(1.5, Color32::WHITE),
            shadow_color: Color32::from_black_alpha(40),
        }
    }
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            text_color: Color32::from_gray(120),
            font_id: FontId::proportional(16.0),
        }
    }
}

/// Convert `[r, g, b]` to a colour
pub fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

/// Convert `[r, g, b, a]` (unmultiplied) to a colour
pub fn rgba(color: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        assert_eq!(rgb([37, 99, 235]), Color32::from_rgb(37, 99, 235));
        assert_eq!(rgba([0, 0, 0, 255]), Color32::BLACK);
    }
}
