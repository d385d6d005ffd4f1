//! Vector equipment icons drawn with the egui painter

use crate::data::equipment::EquipmentIcon;
use egui::{epaint::PathShape, Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

/// Paint `icon` inside `rect`. Unknown icons get a dashed placeholder circle.
pub fn paint_icon(painter: &Painter, icon: &EquipmentIcon, rect: Rect, color: Color32) {
    let size = rect.width().min(rect.height());
    let stroke = Stroke::new((size / 12.0).max(1.0), color);
    let c = rect.center();
    // Map unit coordinates (-0.5..0.5) into the icon rect
    let at = |x: f32, y: f32| Pos2::new(c.x + x * size, c.y + y * size);

    match icon {
        EquipmentIcon::ShowerHead => {
            painter.line_segment([at(-0.35, -0.4), at(0.05, -0.4)], stroke);
            painter.line_segment([at(0.05, -0.4), at(0.05, -0.2)], stroke);
            painter.add(Shape::convex_polygon(
                vec![at(-0.2, -0.2), at(0.3, -0.2), at(0.15, -0.05), at(-0.05, -0.05)],
                color,
                Stroke::NONE,
            ));
            for (x, y) in [(-0.1, 0.1), (0.05, 0.15), (0.2, 0.1), (-0.05, 0.3), (0.15, 0.3)] {
                painter.circle_filled(at(x, y), size * 0.04, color);
            }
        }
        EquipmentIcon::Wind => {
            for (y, len) in [(-0.2, 0.6), (0.0, 0.8), (0.2, 0.5)] {
                painter.line_segment([at(-0.4, y), at(-0.4 + len, y)], stroke);
            }
            painter.circle_stroke(at(0.2, -0.28), size * 0.08, stroke);
            painter.circle_stroke(at(0.05, 0.28), size * 0.08, stroke);
        }
        EquipmentIcon::Droplets => {
            paint_drop(painter, at(-0.15, 0.1), size * 0.22, color);
            paint_drop(painter, at(0.2, -0.05), size * 0.16, color);
        }
        EquipmentIcon::Shield => {
            painter.add(PathShape::closed_line(
                vec![
                    at(0.0, -0.42),
                    at(0.35, -0.28),
                    at(0.3, 0.1),
                    at(0.0, 0.42),
                    at(-0.3, 0.1),
                    at(-0.35, -0.28),
                ],
                stroke,
            ));
        }
        EquipmentIcon::Flame => {
            painter.add(Shape::convex_polygon(
                vec![
                    at(0.0, -0.42),
                    at(0.22, -0.1),
                    at(0.28, 0.15),
                    at(0.15, 0.38),
                    at(-0.15, 0.38),
                    at(-0.28, 0.15),
                    at(-0.18, -0.05),
                ],
                color,
                Stroke::NONE,
            ));
        }
        EquipmentIcon::FireExtinguisher => {
            let body = Rect::from_center_size(at(0.0, 0.1), Vec2::new(size * 0.34, size * 0.62));
            painter.rect_filled(body, size * 0.1, color);
            painter.line_segment([at(0.0, -0.21), at(0.0, -0.35)], stroke);
            painter.line_segment([at(0.0, -0.35), at(0.28, -0.35)], stroke);
            painter.line_segment([at(-0.1, -0.32), at(-0.25, -0.2)], stroke);
        }
        EquipmentIcon::Unknown(_) => {
            paint_placeholder(painter, rect, color);
        }
    }
}

/// Generic glyph for icons we cannot draw
pub fn paint_placeholder(painter: &Painter, rect: Rect, color: Color32) {
    let size = rect.width().min(rect.height());
    let radius = size * 0.38;
    let stroke = Stroke::new((size / 12.0).max(1.0), color);
    let segments = 12;
    for i in (0..segments).step_by(2) {
        let a0 = i as f32 / segments as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
        painter.line_segment(
            [
                rect.center() + Vec2::angled(a0) * radius,
                rect.center() + Vec2::angled(a1) * radius,
            ],
            stroke,
        );
    }
    painter.circle_filled(rect.center(), size * 0.06, color);
}

fn paint_drop(painter: &Painter, center: Pos2, radius: f32, color: Color32) {
    painter.circle_filled(center, radius, color);
    painter.add(Shape::convex_polygon(
        vec![
            center + Vec2::new(0.0, -radius * 2.0),
            center + Vec2::new(radius * 0.95, -radius * 0.3),
            center + Vec2::new(-radius * 0.95, -radius * 0.3),
        ],
        color,
        Stroke::NONE,
    ));
}
