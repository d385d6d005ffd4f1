use crate::core::bounds::Bounds;
use crate::ui::style::ToolbarStyle;
use egui::{Align2, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

/// Where an overlay element sits inside its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    TopRight,
    BottomCenter,
}

impl Position {
    pub fn calculate_rect(&self, container: Rect, size: Vec2, margin: f32) -> Rect {
        let pos = match self {
            Position::TopRight => Pos2::new(container.max.x - margin - size.x, container.min.y + margin),
            Position::BottomCenter => {
                let x = container.center().x - size.x / 2.0;
                Pos2::new(x, container.max.y - margin - size.y)
            }
        };
        Rect::from_min_size(pos, size)
    }
}

/// Buttons on the floating toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    ZoomIn,
    ZoomOut,
    Reset,
    HandTool,
    ClearAll,
}

impl ToolbarButton {
    fn label(&self) -> &'static str {
        match self {
            ToolbarButton::ZoomIn => "+",
            ToolbarButton::ZoomOut => "\u{2212}",
            ToolbarButton::Reset => "\u{27F2}",
            ToolbarButton::HandTool => "\u{270B}",
            ToolbarButton::ClearAll => "Clear All Markers",
        }
    }

    fn tooltip(&self) -> &'static str {
        match self {
            ToolbarButton::ZoomIn => "Zoom in",
            ToolbarButton::ZoomOut => "Zoom out",
            ToolbarButton::Reset => "Reset zoom",
            ToolbarButton::HandTool => "Hand tool",
            ToolbarButton::ClearAll => "Remove every marker in this scenario",
        }
    }
}

/// Zoom, reset, hand tool and "Clear All" controls floating over the viewer
#[derive(Debug, Clone)]
pub struct FloatingToolbar {
    pub hand_tool: bool,
    /// "Clear All Markers" only appears while markers exist
    pub show_clear_all: bool,
    position: Position,
}

impl FloatingToolbar {
    pub fn new(hand_tool: bool, show_clear_all: bool) -> Self {
        Self {
            hand_tool,
            show_clear_all,
            position: Position::BottomCenter,
        }
    }

    pub fn buttons(&self) -> Vec<ToolbarButton> {
        let mut buttons = vec![
            ToolbarButton::ZoomIn,
            ToolbarButton::ZoomOut,
            ToolbarButton::Reset,
            ToolbarButton::HandTool,
        ];
        if self.show_clear_all {
            buttons.push(ToolbarButton::ClearAll);
        }
        buttons
    }

    fn button_size(button: ToolbarButton, style: &ToolbarStyle) -> Vec2 {
        match button {
            ToolbarButton::ClearAll => Vec2::new(style.button_size * 4.5, style.button_size),
            _ => Vec2::splat(style.button_size),
        }
    }

    /// Panel rect and button rects inside `container`
    pub fn layout(&self, container: Rect, style: &ToolbarStyle) -> (Rect, Vec<(ToolbarButton, Rect)>) {
        let buttons = self.buttons();
        let width: f32 = buttons
            .iter()
            .map(|b| Self::button_size(*b, style).x)
            .sum::<f32>()
            + style.spacing * (buttons.len() + 1) as f32;
        let height = style.button_size + style.spacing * 2.0;

        let panel = self
            .position
            .calculate_rect(container, Vec2::new(width, height), style.margin);

        let mut x = panel.min.x + style.spacing;
        let rects = buttons
            .into_iter()
            .map(|button| {
                let size = Self::button_size(button, style);
                let rect = Rect::from_min_size(Pos2::new(x, panel.min.y + style.spacing), size);
                x += size.x + style.spacing;
                (button, rect)
            })
            .collect();
        (panel, rects)
    }

    /// Screen region the toolbar covers, for suppressing clicks beneath it
    pub fn region(&self, container: Rect, style: &ToolbarStyle) -> Bounds {
        let (panel, _) = self.layout(container, style);
        rect_to_bounds(panel)
    }

    /// Draw the toolbar and return the button clicked this frame
    pub fn show(&self, ui: &mut Ui, container: Rect, style: &ToolbarStyle) -> Option<ToolbarButton> {
        let (panel, rects) = self.layout(container, style);
        ui.painter().rect_filled(panel, style.rounding, style.panel_color);
        ui.painter().rect_stroke(panel, style.rounding, style.border_stroke);

        let mut clicked = None;
        for (button, rect) in rects {
            let response = self.button(ui, button, rect, style);
            if response.clicked() {
                clicked = Some(button);
            }
        }
        clicked
    }

    fn button(&self, ui: &mut Ui, button: ToolbarButton, rect: Rect, style: &ToolbarStyle) -> Response {
        let response = ui
            .allocate_rect(rect, Sense::click())
            .on_hover_text(button.tooltip());

        let (fill, text_color) = match button {
            ToolbarButton::ClearAll => (style.danger_color, egui::Color32::WHITE),
            ToolbarButton::HandTool if self.hand_tool => (style.active_color, style.text_color),
            _ if response.hovered() => (style.hover_color, style.text_color),
            _ => (style.background_color, style.text_color),
        };

        ui.painter().rect_filled(rect, style.rounding, fill);
        let border = if button == ToolbarButton::HandTool && self.hand_tool {
            Stroke::new(style.border_stroke.width, style.text_color)
        } else {
            style.border_stroke
        };
        ui.painter().rect_stroke(rect, style.rounding, border);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            button.label(),
            FontId::proportional(if button == ToolbarButton::ClearAll { 13.0 } else { 16.0 }),
            text_color,
        );
        response
    }
}

pub fn rect_to_bounds(rect: Rect) -> Bounds {
    Bounds::from_coords(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.max.x as f64,
        rect.max.y as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_all_only_with_markers() {
        assert_eq!(FloatingToolbar::new(false, false).buttons().len(), 4);
        assert_eq!(
            FloatingToolbar::new(false, true).buttons().last(),
            Some(&ToolbarButton::ClearAll)
        );
    }

    #[test]
    fn test_layout_is_centered_at_bottom() {
        let style = ToolbarStyle::default();
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let toolbar = FloatingToolbar::new(false, true);
        let (panel, rects) = toolbar.layout(container, &style);

        assert!((panel.center().x - 400.0).abs() < 0.01);
        assert!((panel.max.y - (600.0 - style.margin)).abs() < 0.01);
        assert_eq!(rects.len(), 5);
        assert!(rects.iter().all(|(_, rect)| panel.contains_rect(*rect)));

        let region = toolbar.region(container, &style);
        assert!(region.contains(&crate::core::geo::Point::new(400.0, 570.0)));
    }
}
