use eframe::egui::Color32;

use super::Glyph;

pub const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub const PARTNER_EDGE: Color32 = Color32::from_rgb(122, 132, 148);
pub const CHILD_EDGE: Color32 = Color32::from_rgb(168, 176, 190);
pub const EDGE_WIDTH: f32 = 1.4;

pub const NODE_STROKE: Color32 = Color32::from_rgb(15, 15, 15);
pub const NODE_STROKE_WIDTH: f32 = 1.0;
pub const SELECTED_STROKE: Color32 = Color32::from_rgb(245, 206, 93);
pub const SELECTED_STROKE_WIDTH: f32 = 3.0;
pub const SEARCH_STROKE: Color32 = Color32::from_rgb(103, 196, 255);
pub const SEARCH_STROKE_WIDTH: f32 = 2.0;
pub const PIN_MARK: Color32 = Color32::from_rgb(240, 240, 240);
pub const PIN_MARK_RADIUS: f32 = 2.5;
pub const ROUNDED_CORNER: f32 = 6.0;

pub const LABEL_TEXT: Color32 = Color32::from_rgb(238, 238, 238);
pub const LABEL_MATCH_TEXT: Color32 = Color32::from_rgb(18, 22, 28);
pub const LABEL_MATCH_BACKGROUND: Color32 = SEARCH_STROKE;
pub const LABEL_SIZE: f32 = 12.0;
pub const NOTES_TEXT: Color32 = Color32::from_rgb(170, 178, 190);
pub const NOTES_SIZE: f32 = 10.0;
pub const NOTES_GAP: f32 = 4.0;
pub const MIN_TEXT_PX: f32 = 5.0;

pub fn edge_screen_width(zoom: f32) -> f32 {
    (EDGE_WIDTH * zoom.sqrt()).clamp(0.6, 3.0)
}

pub fn text_visible(world_size: f32, zoom: f32) -> bool {
    world_size * zoom >= MIN_TEXT_PX
}

pub fn glyph_fill(glyph: Glyph) -> Color32 {
    match glyph {
        Glyph::Diamond => Color32::from_rgb(235, 190, 90),
        Glyph::RoundedRect => Color32::from_rgb(64, 118, 186),
        Glyph::Ellipse => Color32::from_rgb(186, 82, 128),
        Glyph::Neutral => Color32::from_rgb(104, 110, 120),
    }
}

pub fn node_stroke(selected: bool, search_hit: bool) -> (Color32, f32) {
    if selected {
        (SELECTED_STROKE, SELECTED_STROKE_WIDTH)
    } else if search_hit {
        (SEARCH_STROKE, SEARCH_STROKE_WIDTH)
    } else {
        (NODE_STROKE, NODE_STROKE_WIDTH)
    }
}

pub fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
