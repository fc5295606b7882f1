use eframe::egui::{Pos2, Rect, Vec2};
use log::debug;

use crate::graph::NodeKey;
use crate::physics::LayoutCommand;

pub const DEFAULT_ZOOM_RANGE: (f32, f32) = (0.1, 3.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pan: Vec2,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::with_zoom_range(DEFAULT_ZOOM_RANGE.0, DEFAULT_ZOOM_RANGE.1)
    }
}

impl ViewTransform {
    pub fn with_zoom_range(min_zoom: f32, max_zoom: f32) -> Self {
        let min_zoom = min_zoom.max(f32::EPSILON);
        let max_zoom = max_zoom.max(min_zoom);
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set(&mut self, pan: Vec2, zoom: f32) {
        if pan.is_finite() {
            self.pan = pan;
        }
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0_f32.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.pan += delta;
        }
    }

    pub fn zoom_about(&mut self, rect: Rect, pointer: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world_before = self.screen_to_world(rect, pointer);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub fn fit(&mut self, viewport: Vec2, bounds: Rect, margin: f32) {
        if !bounds.is_finite() {
            return;
        }
        let available = (viewport - Vec2::splat(margin * 2.0)).max(Vec2::splat(1.0));
        let size = bounds.size().max(Vec2::splat(1.0));
        self.zoom = (available.x / size.x)
            .min(available.y / size.y)
            .clamp(self.min_zoom, self.max_zoom);
        self.pan = -bounds.center().to_vec2() * self.zoom;
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DragState {
    key: NodeKey,
    last_point: Vec2,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    drag: Option<DragState>,
    selected: Option<NodeKey>,
    lock_on_drag_end: bool,
    outbox: Vec<LayoutCommand>,
}

impl InteractionController {
    pub fn new(lock_on_drag_end: bool) -> Self {
        Self {
            lock_on_drag_end,
            ..Self::default()
        }
    }

    pub fn set_lock_on_drag_end(&mut self, lock: bool) {
        self.lock_on_drag_end = lock;
    }

    pub fn lock_on_drag_end(&self) -> bool {
        self.lock_on_drag_end
    }

    pub fn dragging(&self) -> Option<&NodeKey> {
        self.drag.as_ref().map(|drag| &drag.key)
    }

    pub fn begin_drag(&mut self, key: NodeKey, point: Vec2) {
        if let Some(previous) = self.drag.take() {
            // A drag that never saw its end; release it the same way.
            self.release(previous.key);
        }
        debug!("drag start on {key}");
        self.outbox.push(LayoutCommand::Heat);
        self.outbox.push(LayoutCommand::Pin {
            key: key.clone(),
            position: point,
        });
        self.drag = Some(DragState {
            key,
            last_point: point,
        });
    }

    pub fn continue_drag(&mut self, key: &NodeKey, point: Vec2) {
        let Some(drag) = self.drag.as_mut().filter(|drag| &drag.key == key) else {
            return;
        };
        if drag.last_point == point {
            return;
        }
        drag.last_point = point;
        self.outbox.push(LayoutCommand::Pin {
            key: key.clone(),
            position: point,
        });
    }

    pub fn end_drag(&mut self, key: &NodeKey) {
        if !self.drag.as_ref().is_some_and(|drag| &drag.key == key) {
            return;
        }
        if let Some(drag) = self.drag.take() {
            debug!("drag end on {}", drag.key);
            self.release(drag.key);
        }
    }

    fn release(&mut self, key: NodeKey) {
        self.outbox.push(LayoutCommand::Cool);
        if !self.lock_on_drag_end {
            self.outbox.push(LayoutCommand::Unpin { key });
        }
    }

    pub fn select(&mut self, key: Option<NodeKey>) {
        self.selected = key;
    }

    pub fn selected(&self) -> Option<&NodeKey> {
        self.selected.as_ref()
    }

    pub fn unpin(&mut self, key: NodeKey) {
        self.outbox.push(LayoutCommand::Unpin { key });
    }

    pub fn unpin_all(&mut self) {
        self.outbox.push(LayoutCommand::UnpinAll);
    }

    pub fn reheat(&mut self) {
        self.outbox.push(LayoutCommand::Reheat);
    }

    pub fn has_pending(&self) -> bool {
        !self.outbox.is_empty()
    }

    pub fn drain_commands(&mut self) -> std::vec::Drain<'_, LayoutCommand> {
        self.outbox.drain(..)
    }

    pub fn retain_nodes(&mut self, exists: impl Fn(&NodeKey) -> bool) {
        if self.drag.as_ref().is_some_and(|drag| !exists(&drag.key)) {
            self.drag = None;
            self.outbox.push(LayoutCommand::Cool);
        }
        if self.selected.as_ref().is_some_and(|key| !exists(key)) {
            self.selected = None;
        }
    }
}
