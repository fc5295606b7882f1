use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, PointerButton, Pos2, Rect, Sense, Shape, Stroke,
    StrokeKind, Ui, Vec2, vec2,
};

use crate::graph::{EdgeKind, NodeKey, RenderNode};
use crate::interaction::ViewTransform;
use crate::physics::EnergyState;
use crate::scene::{ARROW_LENGTH, Glyph, Scene, SceneNode, style};

use super::ViewModel;
use super::render_utils::{draw_background, edge_visible, glyph_visible};

const SCROLL_ZOOM_RATE: f32 = 0.0018;

impl ViewModel {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_size = rect.size();

        self.handle_zoom(ui, rect, &response);
        self.handle_pointer(rect, &response);

        if self.live_physics {
            self.session.tick();
        } else {
            self.session.refresh_scene();
        }
        if self.fit_pending && rect.width() > 1.0 && rect.height() > 1.0 {
            self.session.fit_view(rect.size());
            self.fit_pending = false;
        }

        let moving = self.live_physics && self.session.energy_state() != EnergyState::Settled;
        if moving || self.session.dragging().is_some() {
            ui.ctx().request_repaint();
        }

        let view = *self.session.view();
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, view.pan(), view.zoom());
        paint_scene(&painter, rect, &view, self.session.scene());

        let hovered = response
            .hover_pos()
            .and_then(|pointer| self.session.hit_test(view.screen_to_world(rect, pointer)));
        if let Some(key) = hovered {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
            self.paint_hover_caption(&painter, rect, &key);
        }
    }

    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
        let factor = (1.0 + (scroll * SCROLL_ZOOM_RATE)).clamp(0.85, 1.15);
        self.session.view_mut().zoom_about(rect, pointer, factor);
    }

    fn handle_pointer(&mut self, rect: Rect, response: &egui::Response) {
        let view = *self.session.view();
        let world_at = |pointer: Pos2| view.screen_to_world(rect, pointer);

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = world_at(pointer);
            if let Some(key) = self.session.hit_test(world) {
                self.session.begin_drag(key, world);
            }
        }

        if response.dragged_by(PointerButton::Primary) {
            match (self.session.dragging().cloned(), response.interact_pointer_pos()) {
                (Some(key), Some(pointer)) => self.session.continue_drag(&key, world_at(pointer)),
                (None, _) => self.session.view_mut().pan_by(response.drag_delta()),
                (Some(_), None) => {}
            }
        }

        if response.drag_stopped()
            && let Some(key) = self.session.dragging().cloned()
        {
            self.session.end_drag(&key);
        }

        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.session.view_mut().pan_by(response.drag_delta());
        }

        if response.clicked_by(PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.session.hit_test(world_at(pointer)));
            self.session.select(hit);
        }
    }

    fn paint_hover_caption(&self, painter: &Painter, rect: Rect, key: &NodeKey) {
        let caption = match self.session.graph().node(key) {
            Some(RenderNode::Person(person)) => {
                let name = if person.name.trim().is_empty() {
                    person.id.as_str()
                } else {
                    person.name.as_str()
                };
                format!("{name}  |  {}  |  {}", person.sex.label(), person.id)
            }
            Some(RenderNode::Union(union)) => format!(
                "union {}  |  {} + {}",
                union.id,
                self.session.dataset().person_name(&union.partner_a),
                self.session.dataset().person_name(&union.partner_b)
            ),
            None => return,
        };
        let pinned = if self.session.engine().is_pinned(key) {
            "  |  pinned"
        } else {
            ""
        };

        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            format!("{caption}{pinned}"),
            FontId::proportional(13.0),
            Color32::from_gray(240),
        );
    }
}

fn paint_scene(painter: &Painter, rect: Rect, view: &ViewTransform, scene: &Scene) {
    let zoom = view.zoom();
    let edge_width = style::edge_screen_width(zoom);

    for edge in scene.edges() {
        let start = view.world_to_screen(rect, edge.from);
        let end = view.world_to_screen(rect, edge.to);
        if !edge_visible(rect, start, end, 4.0) {
            continue;
        }
        let color = match edge.kind {
            EdgeKind::Partner => style::PARTNER_EDGE,
            EdgeKind::Child => style::CHILD_EDGE,
        };

        match edge.arrow {
            Some(arrow) => {
                let direction = (arrow[0] - edge.from).normalized();
                let base = view.world_to_screen(rect, arrow[0] - direction * ARROW_LENGTH);
                painter.line_segment([start, base], Stroke::new(edge_width, color));
                let points = arrow
                    .iter()
                    .map(|corner| view.world_to_screen(rect, *corner))
                    .collect();
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }
            None => {
                painter.line_segment([start, end], Stroke::new(edge_width, color));
            }
        }
    }

    for node in scene.nodes() {
        let center = view.world_to_screen(rect, node.center);
        let half = node.glyph.half_size() * zoom;
        let notes_reach = if node.notes.is_some() { 40.0 } else { 0.0 };
        if !glyph_visible(rect, center, half + vec2(0.0, notes_reach)) {
            continue;
        }
        paint_glyph(painter, node, center, half);
        paint_text(painter, node, center, half, zoom);
    }
}

fn paint_glyph(painter: &Painter, node: &SceneNode, center: Pos2, half: Vec2) {
    let fill = style::glyph_fill(node.glyph);
    let (stroke_color, stroke_width) = style::node_stroke(node.selected, node.search_hit);
    let stroke = Stroke::new(stroke_width, stroke_color);

    match node.glyph {
        Glyph::Diamond => {
            let points = vec![
                center - vec2(0.0, half.y),
                center + vec2(half.x, 0.0),
                center + vec2(0.0, half.y),
                center - vec2(half.x, 0.0),
            ];
            painter.add(Shape::convex_polygon(points, fill, stroke));
        }
        Glyph::Ellipse => {
            painter.add(Shape::ellipse_filled(center, half, fill));
            painter.add(Shape::ellipse_stroke(center, half, stroke));
        }
        Glyph::RoundedRect | Glyph::Neutral => {
            let corner = if node.glyph == Glyph::RoundedRect {
                style::ROUNDED_CORNER * (half.y / crate::scene::PERSON_HALF_SIZE.y)
            } else {
                0.0
            };
            painter.rect(
                Rect::from_center_size(center, half * 2.0),
                corner,
                fill,
                stroke,
                StrokeKind::Middle,
            );
        }
    }

    if node.pinned {
        painter.circle_filled(
            center + vec2(half.x * 0.7, -half.y * 0.7),
            style::PIN_MARK_RADIUS,
            style::PIN_MARK,
        );
    }
}

fn paint_text(painter: &Painter, node: &SceneNode, center: Pos2, half: Vec2, zoom: f32) {
    let label_size = style::LABEL_SIZE * zoom;
    if !node.label.is_empty() && style::text_visible(style::LABEL_SIZE, zoom) {
        let mut job = LayoutJob::default();
        for span in &node.label {
            let format = if span.matched {
                TextFormat {
                    font_id: FontId::proportional(label_size),
                    color: style::LABEL_MATCH_TEXT,
                    background: style::LABEL_MATCH_BACKGROUND,
                    ..Default::default()
                }
            } else {
                TextFormat {
                    font_id: FontId::proportional(label_size),
                    color: style::LABEL_TEXT,
                    ..Default::default()
                }
            };
            job.append(&span.text, 0.0, format);
        }
        let galley = painter.layout_job(job);
        let top_left = center - galley.size() * 0.5;
        painter.galley(top_left, galley, style::LABEL_TEXT);
    }

    let notes_size = style::NOTES_SIZE * zoom;
    if let Some(notes) = &node.notes
        && style::text_visible(style::NOTES_SIZE, zoom)
    {
        painter.text(
            center + vec2(0.0, half.y + style::NOTES_GAP * zoom),
            Align2::CENTER_TOP,
            notes,
            FontId::proportional(notes_size),
            style::NOTES_TEXT,
        );
    }
}
