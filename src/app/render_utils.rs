use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::scene::style;

const GRID_LINE: Color32 = Color32::from_rgba_premultiplied(24, 28, 32, 70);

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, style::BACKGROUND);

    let step = (64.0 * zoom.clamp(0.5, 2.0)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, GRID_LINE);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn glyph_visible(clip: Rect, center: Pos2, half: Vec2) -> bool {
    clip.intersects(Rect::from_center_size(center, half * 2.0))
}

pub(super) fn edge_visible(clip: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    clip.intersects(Rect::from_two_pos(start, end).expand(padding))
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn culling_keeps_shapes_that_straddle_the_edge() {
        let clip = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(glyph_visible(clip, pos2(-5.0, 50.0), vec2(10.0, 10.0)));
        assert!(!glyph_visible(clip, pos2(-50.0, 50.0), vec2(10.0, 10.0)));
        assert!(edge_visible(clip, pos2(-20.0, 50.0), pos2(120.0, 50.0), 1.0));
        assert!(!edge_visible(clip, pos2(-20.0, -20.0), pos2(-10.0, -40.0), 1.0));
    }
}
