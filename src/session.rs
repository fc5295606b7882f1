use eframe::egui::Vec2;
use log::{debug, info};

use crate::family::{Dataset, EditError};
use crate::graph::{NodeKey, RenderGraph};
use crate::interaction::{InteractionController, ViewTransform};
use crate::physics::{EnergyState, ForceParams, LayoutCommand, LayoutEngine};
use crate::scene::{Scene, SceneInputs, render_svg};
use crate::settings::LayoutSettings;

const FIT_MARGIN: f32 = 40.0;

pub struct Session {
    dataset: Dataset,
    graph: RenderGraph,
    engine: LayoutEngine,
    settings: LayoutSettings,
    controller: InteractionController,
    view: ViewTransform,
    search: String,
    scene: Scene,
    scene_dirty: bool,
    graph_revision: u64,
}

impl Session {
    pub fn new(dataset: Dataset, settings: LayoutSettings) -> Self {
        let settings = settings.sanitized();
        let graph = RenderGraph::build(&dataset);
        let engine = LayoutEngine::new(&graph, ForceParams::from(&settings));
        info!(
            "session opened: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let mut session = Self {
            dataset,
            graph,
            engine,
            settings,
            controller: InteractionController::new(settings.lock_on_drag_end),
            view: ViewTransform::default(),
            search: String::new(),
            scene: Scene::default(),
            scene_dirty: true,
            graph_revision: 0,
        };
        session.refresh_scene();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn graph_revision(&self) -> u64 {
        self.graph_revision
    }

    pub fn energy_state(&self) -> EnergyState {
        self.engine.energy_state()
    }

    pub fn edit<T>(
        &mut self,
        operation: impl FnOnce(&mut Dataset) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let outcome = operation(&mut self.dataset)?;
        self.rebuild_graph();
        Ok(outcome)
    }

    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.rebuild_graph();
    }

    fn rebuild_graph(&mut self) {
        // Pins requested against the old graph still carry over by key.
        self.flush_commands();

        self.graph = RenderGraph::build(&self.dataset);
        let placeholder = LayoutEngine::new(&RenderGraph::default(), self.engine.params());
        let previous = std::mem::replace(&mut self.engine, placeholder);
        self.engine = previous.rebuild(&self.graph);

        let graph = &self.graph;
        self.controller
            .retain_nodes(|key| graph.index_of(key).is_some());
        self.flush_commands();

        self.graph_revision = self.graph_revision.wrapping_add(1);
        self.scene_dirty = true;
        info!(
            "graph rebuilt (revision {}): {} nodes, {} edges, {} unresolved",
            self.graph_revision,
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.unresolved_edge_count()
        );
    }

    pub fn update_settings(&mut self, settings: LayoutSettings) {
        let settings = settings.sanitized();
        if settings == self.settings {
            return;
        }

        let previous = std::mem::replace(&mut self.settings, settings);
        self.controller
            .set_lock_on_drag_end(settings.lock_on_drag_end);
        if settings.forces_differ(&previous) {
            self.engine
                .apply(LayoutCommand::Reconfigure(ForceParams::from(&settings)));
        }
        self.scene_dirty = true;
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn fit_view(&mut self, viewport: Vec2) {
        if let Some(bounds) = self.scene.bounds() {
            self.view.fit(viewport, bounds, FIT_MARGIN);
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        if self.search != query {
            self.search = query.to_owned();
            self.scene_dirty = true;
        }
    }

    pub fn selected(&self) -> Option<&NodeKey> {
        self.controller.selected()
    }

    pub fn select(&mut self, key: Option<NodeKey>) {
        let key = key.filter(|key| self.graph.index_of(key).is_some());
        if self.controller.selected() != key.as_ref() {
            debug!(
                "selection: {}",
                key.as_ref()
                    .map_or_else(|| "none".to_owned(), ToString::to_string)
            );
            self.controller.select(key);
            self.scene_dirty = true;
        }
    }

    pub fn dragging(&self) -> Option<&NodeKey> {
        self.controller.dragging()
    }

    pub fn begin_drag(&mut self, key: NodeKey, point: Vec2) {
        if self.graph.index_of(&key).is_none() {
            return;
        }
        self.controller.begin_drag(key, point);
        self.flush_commands();
    }

    pub fn continue_drag(&mut self, key: &NodeKey, point: Vec2) {
        self.controller.continue_drag(key, point);
        self.flush_commands();
    }

    pub fn end_drag(&mut self, key: &NodeKey) {
        self.controller.end_drag(key);
        self.flush_commands();
    }

    pub fn unpin(&mut self, key: NodeKey) {
        self.controller.unpin(key);
        self.controller.reheat();
        self.flush_commands();
    }

    pub fn unpin_all(&mut self) {
        self.controller.unpin_all();
        self.controller.reheat();
        self.flush_commands();
    }

    pub fn reheat(&mut self) {
        self.controller.reheat();
        self.flush_commands();
    }

    fn flush_commands(&mut self) {
        if !self.controller.has_pending() {
            return;
        }
        for command in self.controller.drain_commands() {
            self.engine.apply(command);
        }
        self.scene_dirty = true;
    }

    pub fn tick(&mut self) -> bool {
        self.flush_commands();
        let moved = self.engine.tick();
        if moved {
            self.scene_dirty = true;
        }
        self.refresh_scene()
    }

    pub fn refresh_scene(&mut self) -> bool {
        if !self.scene_dirty {
            return false;
        }
        self.scene.redraw(&SceneInputs {
            graph: &self.graph,
            engine: &self.engine,
            selected: self.controller.selected(),
            search: &self.search,
            show_labels: self.settings.show_labels,
            show_notes: self.settings.show_notes,
        });
        self.scene_dirty = false;
        true
    }

    pub fn hit_test(&self, world: Vec2) -> Option<NodeKey> {
        self.scene.hit_test(world).cloned()
    }

    pub fn export_svg(&self, viewport: Vec2) -> String {
        render_svg(&self.scene, &self.view, viewport)
    }
}
