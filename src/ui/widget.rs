use crate::{
    core::geo::Point,
    input::{
        events::{InputEvent, KeyCode, MouseButton},
        handler::ViewerCursor,
    },
    layers::{
        image::{DecodedImage, ImageState},
        marker::{GlyphLayout, Marker, MarkerGlyph},
    },
    prelude::HashMap,
    session::QuizSession,
    ui::{
        elements::{rect_to_bounds, FloatingToolbar, Position, ToolbarButton},
        icons::paint_icon,
        style::{rgb, rgba, ViewerStyle},
    },
};
use egui::{
    Align2, Color32, ColorImage, CursorIcon, Key, Painter, Pos2, Rect, Response, Sense,
    TextureHandle, TextureId, TextureOptions, Ui, Vec2, Widget,
};

impl From<ViewerCursor> for CursorIcon {
    fn from(cursor: ViewerCursor) -> Self {
        match cursor {
            ViewerCursor::Default => CursorIcon::Default,
            ViewerCursor::Crosshair => CursorIcon::Crosshair,
            ViewerCursor::Grab => CursorIcon::Grab,
            ViewerCursor::Grabbing => CursorIcon::Grabbing,
        }
    }
}

fn to_pos(point: Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// GPU textures for decoded images, keyed by URL
#[derive(Default)]
pub struct ImageTextures {
    textures: HashMap<String, TextureHandle>,
}

impl ImageTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `url`, uploading `image` on first use
    pub fn get_or_load(&mut self, ctx: &egui::Context, url: &str, image: &DecodedImage) -> TextureId {
        self.textures
            .entry(url.to_string())
            .or_insert_with(|| {
                log::debug!("uploading texture for {} ({}x{})", url, image.width, image.height);
                let color_image = ColorImage::from_rgba_unmultiplied(
                    [image.width as usize, image.height as usize],
                    &image.rgba,
                );
                ctx.load_texture(url, color_image, TextureOptions::LINEAR)
            })
            .id()
    }

    /// Drop textures whose URL is no longer shown
    pub fn retain(&mut self, urls: &[&str]) {
        self.textures.retain(|url, _| urls.contains(&url.as_str()));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// The zoomable deck image with markers, answer overlay and floating toolbar.
///
/// Every frame the widget translates egui pointer and keyboard input into
/// [`InputEvent`]s for the session, then paints the session's state.
pub struct ImageViewer<'a> {
    session: &'a mut QuizSession,
    textures: &'a mut ImageTextures,
    style: ViewerStyle,
    size: Option<Vec2>,
}

impl<'a> ImageViewer<'a> {
    pub fn new(session: &'a mut QuizSession, textures: &'a mut ImageTextures) -> Self {
        Self {
            session,
            textures,
            style: ViewerStyle::default(),
            size: None,
        }
    }

    pub fn style(mut self, style: ViewerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let hover_pos = ui
            .input(|i| i.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos));

        self.session.handle_input(InputEvent::Resize {
            origin: to_point(rect.min),
            size: Point::new(rect.width() as f64, rect.height() as f64),
        });
        self.session.handle_input(if hover_pos.is_some() {
            InputEvent::PointerEnter
        } else {
            InputEvent::PointerLeave
        });

        let mut regions = Vec::new();
        if self.session.input().pointer_inside() {
            regions.push(self.toolbar().region(rect, &self.style.toolbar));
        }
        if let Some(toggle) = self.answer_toggle_rect(rect) {
            regions.push(rect_to_bounds(toggle));
        }
        self.session.input_mut().set_overlay_regions(regions);

        let Some(pointer) = hover_pos else {
            return;
        };

        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > 0.1 {
            self.session.handle_input(InputEvent::Scroll {
                delta: scroll as f64,
                position: to_point(pointer),
            });
        }

        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin()).unwrap_or(pointer);
            self.session.handle_input(InputEvent::PointerDown {
                position: to_point(origin),
            });
        }
        if response.dragged() {
            self.session.handle_input(InputEvent::PointerMove {
                position: to_point(pointer),
            });
        }
        if response.drag_released() {
            self.session.handle_input(InputEvent::PointerUp {
                position: to_point(pointer),
            });
        }

        if response.clicked() {
            let point = to_point(pointer);
            let target = MarkerGlyph::remove_target(
                self.session.current_markers(),
                self.session.viewport(),
                self.session.marker_size(),
                &point,
            );
            match target {
                Some(id) => {
                    self.session.remove_marker(id);
                }
                None => {
                    self.session.handle_input(InputEvent::Click {
                        position: point,
                        button: MouseButton::Left,
                    });
                }
            }
        }

        let keys = ui.input(|i| {
            [
                (Key::Plus, KeyCode::Plus),
                (Key::Minus, KeyCode::Minus),
                (Key::Home, KeyCode::Home),
                (Key::Escape, KeyCode::Escape),
            ]
            .into_iter()
            .filter(|(key, _)| i.key_pressed(*key))
            .map(|(_, code)| code)
            .collect::<Vec<_>>()
        });
        for key in keys {
            self.session.handle_input(InputEvent::KeyPress { key });
        }
    }

    fn toolbar(&self) -> FloatingToolbar {
        FloatingToolbar::new(
            self.session.hand_tool_active(),
            !self.session.current_markers().is_empty(),
        )
    }

    fn answer_toggle_rect(&self, rect: Rect) -> Option<Rect> {
        let has_answer = self
            .session
            .current_scenario()
            .and_then(|s| s.answer_image.as_ref())
            .is_some();
        has_answer.then(|| Position::TopRight.calculate_rect(rect, Vec2::new(120.0, 28.0), 12.0))
    }

    fn paint_images(&mut self, ui: &Ui, painter: &Painter) -> bool {
        let Some(bounds) = self.session.viewport().displayed_image_bounds() else {
            self.textures.retain(&[]);
            return false;
        };
        let image_rect = Rect::from_min_max(to_pos(bounds.min), to_pos(bounds.max));
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

        let images = self.session.images();
        let question = images.question.url().zip(images.question.image().cloned());
        let answer = images.answer.url().zip(images.answer.image().cloned());
        let (question, answer) = (
            question.map(|(url, image)| (url.to_string(), image)),
            answer.map(|(url, image)| (url.to_string(), image)),
        );

        let mut shown: Vec<&str> = Vec::new();
        if let Some((url, image)) = &question {
            let texture = self.textures.get_or_load(ui.ctx(), url, image);
            painter.image(texture, image_rect, uv, Color32::WHITE);
            shown.push(url);
        }
        if let Some((url, image)) = &answer {
            // Keep the answer texture warm so toggling does not stall
            let texture = self.textures.get_or_load(ui.ctx(), url, image);
            if self.session.show_answer() {
                let opacity = self.session.config().viewer.answer_overlay_opacity;
                painter.image(texture, image_rect, uv, Color32::WHITE.gamma_multiply(opacity));
            }
            shown.push(url);
        }
        self.textures.retain(&shown);
        true
    }

    fn paint_markers(&self, painter: &Painter, hover: Option<Pos2>) {
        let opacity = if self.session.show_answer() {
            self.session.config().viewer.markers_opacity
        } else {
            1.0
        };

        for marker in self.session.current_markers() {
            let Some(layout) =
                MarkerGlyph::layout(marker, self.session.viewport(), self.session.marker_size())
            else {
                continue;
            };
            let hovered = hover.map_or(false, |pos| layout.contains(&to_point(pos)));
            self.paint_glyph(painter, marker, &layout, hovered, opacity);
        }
    }

    fn paint_glyph(&self, painter: &Painter, marker: &Marker, layout: &GlyphLayout, hovered: bool, opacity: f32) {
        let style = &self.style.glyph;
        let center = to_pos(layout.center);
        let radius = layout.radius as f32;
        let color = rgb(MarkerGlyph::foreground_rgb(&marker.equipment.color)).gamma_multiply(opacity);
        let background =
            rgba(MarkerGlyph::background_rgba(&marker.equipment.color)).gamma_multiply(opacity);

        painter.circle_filled(center + Vec2::new(0.0, 1.5), radius + 1.0, style.shadow_color);
        painter.circle_filled(center, radius, Color32::WHITE.gamma_multiply(opacity));
        painter.circle_filled(center, radius, background);
        painter.circle_stroke(center, radius, style.inner_ring);
        painter.circle_stroke(
            center,
            radius + style.inner_ring.width,
            egui::Stroke::new(style.outer_ring_width, color),
        );

        let icon_rect = Rect::from_center_size(center, Vec2::splat(layout.icon_size as f32));
        paint_icon(painter, &marker.equipment.icon, icon_rect, color);

        if hovered {
            let remove_center = to_pos(layout.remove_center);
            let r = layout.remove_radius as f32;
            painter.circle_filled(remove_center, r, style.remove_color);
            let arm = r * 0.5;
            painter.line_segment(
                [remove_center + Vec2::new(-arm, -arm), remove_center + Vec2::new(arm, arm)],
                style.remove_cross,
            );
            painter.line_segment(
                [remove_center + Vec2::new(-arm, arm), remove_center + Vec2::new(arm, -arm)],
                style.remove_cross,
            );
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.session.current_scenario() {
            None => "Select a scenario to begin",
            Some(_) => match self.session.images().question.state() {
                ImageState::Loading => "Loading image\u{2026}",
                _ => "Upload an image for this scenario",
            },
        }
    }

    fn show_overlays(&mut self, ui: &mut Ui, rect: Rect) {
        if let Some(toggle) = self.answer_toggle_rect(rect) {
            let label = if self.session.show_answer() {
                "Hide Answer"
            } else {
                "Show Answer"
            };
            if ui.put(toggle, egui::Button::new(label)).clicked() {
                self.session.toggle_answer();
            }
        }

        if !self.session.input().pointer_inside() || !self.session.viewport().has_image() {
            return;
        }

        match self.toolbar().show(ui, rect, &self.style.toolbar) {
            Some(ToolbarButton::ZoomIn) => self.session.zoom_in(),
            Some(ToolbarButton::ZoomOut) => self.session.zoom_out(),
            Some(ToolbarButton::Reset) => self.session.reset_zoom(),
            Some(ToolbarButton::HandTool) => {
                let active = self.session.hand_tool_active();
                self.session.set_hand_tool(!active);
            }
            Some(ToolbarButton::ClearAll) => {
                let removed = self.session.clear_all();
                log::info!("cleared {} markers", removed);
            }
            None => {}
        }
    }
}

impl<'a> Widget for ImageViewer<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.handle_input(ui, rect, &response);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.style.background_color);

        if self.paint_images(ui, &painter) {
            let hover = ui.input(|i| i.pointer.hover_pos()).filter(|p| rect.contains(*p));
            self.paint_markers(&painter, hover);
        } else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.placeholder(),
                self.style.placeholder.font_id.clone(),
                self.style.placeholder.text_color,
            );
        }
        painter.rect_stroke(rect, 0.0, self.style.border_stroke);

        self.show_overlays(ui, rect);

        let equipment_selected = self.session.selected_equipment().is_some();
        let cursor = self.session.input().cursor(equipment_selected);
        if response.hovered() {
            ui.output_mut(|o| o.cursor_icon = cursor.into());
        }

        if self.session.input().is_dragging() {
            ui.ctx().request_repaint();
        }

        response
    }
}
