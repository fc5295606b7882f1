mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use log::debug;

use crate::graph::{NodeKey, NodeKind, RenderGraph};
use crate::settings::LayoutSettings;
use crate::util::stable_pair;
use forces::{
    CollisionParams, LinkSpring, accumulate_charge, accumulate_collision_pairs,
    apply_link_springs,
};
use quadtree::QuadNode;

pub const ALPHA_MIN: f32 = 0.001;
pub const DRAG_ALPHA_TARGET: f32 = 0.3;
const COOLING_TICKS: f32 = 300.0;
const VELOCITY_DECAY: f32 = 0.4;
const MAX_LINK_STRENGTH: f32 = 0.7;
const COLLIDE_STRENGTH: f32 = 0.7;
const CENTER_STRENGTH: f32 = 0.1;
const UNION_RADIUS_SCALE: f32 = 0.35;
const BARNES_HUT_THETA: f32 = 0.9;
const MOTION_EPSILON_SQ: f32 = 0.01 * 0.01;
const INITIAL_SPREAD: f32 = 10.0;

fn alpha_decay() -> f32 {
    1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    pub link_distance: f32,
    pub charge: f32,
    pub collide_radius: f32,
    pub center: Vec2,
}

impl From<&LayoutSettings> for ForceParams {
    fn from(settings: &LayoutSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            link_distance: settings.link_distance,
            charge: settings.charge,
            collide_radius: settings.collide_radius,
            center: vec2(settings.center[0], settings.center[1]),
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::from(&LayoutSettings::default())
    }
}

impl ForceParams {
    fn radius_for(&self, kind: NodeKind) -> f32 {
        match kind {
            NodeKind::Person => self.collide_radius,
            NodeKind::Union => self.collide_radius * UNION_RADIUS_SCALE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyState {
    Running,
    Cooling,
    Settled,
}

impl EnergyState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cooling => "cooling",
            Self::Settled => "settled",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutCommand {
    Pin { key: NodeKey, position: Vec2 },
    Unpin { key: NodeKey },
    UnpinAll,
    Heat,
    Cool,
    Reheat,
    Reconfigure(ForceParams),
}

#[derive(Clone, Copy, Debug)]
struct Body {
    position: Vec2,
    velocity: Vec2,
    pinned: Option<Vec2>,
    radius: f32,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

pub struct LayoutEngine {
    keys: Vec<NodeKey>,
    index_by_key: HashMap<NodeKey, usize>,
    bodies: Vec<Body>,
    springs: Vec<LinkSpring>,
    params: ForceParams,
    alpha: f32,
    alpha_target: f32,
    ticks: u64,
    scratch: PhysicsScratch,
}

impl LayoutEngine {
    pub fn new(graph: &RenderGraph, params: ForceParams) -> Self {
        Self::seeded(graph, params, None)
    }

    /// Positions, pins and the heat target carry over by node key.
    pub fn rebuild(self, graph: &RenderGraph) -> Self {
        let params = self.params;
        Self::seeded(graph, params, Some(self))
    }

    fn seeded(graph: &RenderGraph, params: ForceParams, previous: Option<Self>) -> Self {
        let keys = graph.nodes().iter().map(|node| node.key()).collect::<Vec<_>>();
        let mut index_by_key = HashMap::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            index_by_key.entry(key.clone()).or_insert(index);
        }

        let mut carried = 0usize;
        let mut bodies = Vec::with_capacity(keys.len());
        let mut placed = Vec::with_capacity(keys.len());
        for key in &keys {
            let prior = previous.as_ref().and_then(|engine| engine.body(key));
            placed.push(prior.is_some());
            if prior.is_some() {
                carried += 1;
            }
            let radius = params.radius_for(key.kind);
            bodies.push(match prior {
                Some(body) => Body { radius, ..body },
                None => Body {
                    position: Vec2::ZERO,
                    velocity: Vec2::ZERO,
                    pinned: None,
                    radius,
                },
            });
        }

        for index in 0..bodies.len() {
            if placed[index] {
                continue;
            }
            let anchor = graph
                .neighbors(index)
                .find(|&neighbor| placed[neighbor])
                .map(|neighbor| bodies[neighbor].position);
            bodies[index].position = match anchor {
                Some(anchor) => {
                    let (jx, jy) = stable_pair(&keys[index].id);
                    let mut direction = vec2(jx, jy);
                    if direction.length_sq() <= 0.0001 {
                        direction = forces::separation_direction(index, index + 1);
                    }
                    anchor + direction.normalized() * (params.link_distance * 0.5)
                }
                None => params.center + phyllotaxis(index),
            };
            placed[index] = true;
        }

        let springs = link_springs(graph);
        let alpha_target = previous.as_ref().map_or(0.0, |engine| engine.alpha_target);

        debug!(
            "layout engine seeded: {} bodies ({carried} carried over), {} springs",
            bodies.len(),
            springs.len()
        );

        Self {
            keys,
            index_by_key,
            bodies,
            springs,
            params,
            alpha: 1.0,
            alpha_target,
            ticks: 0,
            scratch: PhysicsScratch::default(),
        }
    }

    fn body(&self, key: &NodeKey) -> Option<Body> {
        self.index_by_key
            .get(key)
            .and_then(|&index| self.bodies.get(index))
            .copied()
    }

    pub fn node_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn params(&self) -> ForceParams {
        self.params
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn energy_state(&self) -> EnergyState {
        if self.alpha_target >= ALPHA_MIN || self.alpha > DRAG_ALPHA_TARGET {
            EnergyState::Running
        } else if self.alpha >= ALPHA_MIN {
            EnergyState::Cooling
        } else {
            EnergyState::Settled
        }
    }

    pub fn position(&self, key: &NodeKey) -> Option<Vec2> {
        self.body(key).map(|body| body.position)
    }

    pub fn position_at(&self, index: usize) -> Option<Vec2> {
        self.bodies.get(index).map(|body| body.position)
    }

    pub fn is_pinned(&self, key: &NodeKey) -> bool {
        self.body(key).is_some_and(|body| body.pinned.is_some())
    }

    pub fn is_pinned_at(&self, index: usize) -> bool {
        self.bodies
            .get(index)
            .is_some_and(|body| body.pinned.is_some())
    }

    pub fn pinned_count(&self) -> usize {
        self.bodies
            .iter()
            .filter(|body| body.pinned.is_some())
            .count()
    }

    pub fn positions(&self) -> impl Iterator<Item = (&NodeKey, Vec2)> + '_ {
        self.keys
            .iter()
            .zip(&self.bodies)
            .map(|(key, body)| (key, body.position))
    }

    pub fn apply(&mut self, command: LayoutCommand) {
        debug!("layout command: {command:?}");
        match command {
            LayoutCommand::Pin { key, position } => {
                let Some(&index) = self.index_by_key.get(&key) else {
                    return;
                };
                if !position.is_finite() {
                    return;
                }
                let body = &mut self.bodies[index];
                body.pinned = Some(position);
                body.position = position;
                body.velocity = Vec2::ZERO;
            }
            LayoutCommand::Unpin { key } => {
                if let Some(&index) = self.index_by_key.get(&key) {
                    self.bodies[index].pinned = None;
                }
            }
            LayoutCommand::UnpinAll => {
                for body in &mut self.bodies {
                    body.pinned = None;
                }
            }
            LayoutCommand::Heat => {
                self.alpha_target = DRAG_ALPHA_TARGET;
                self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
            }
            LayoutCommand::Cool => {
                self.alpha_target = 0.0;
            }
            LayoutCommand::Reheat => {
                self.alpha = 1.0;
            }
            LayoutCommand::Reconfigure(params) => {
                self.params = params;
                for (key, body) in self.keys.iter().zip(&mut self.bodies) {
                    body.radius = params.radius_for(key.kind);
                }
                self.alpha = 1.0;
            }
        }
    }

    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        let before = self.energy_state();
        if before == EnergyState::Settled || self.bodies.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * alpha_decay();
        let alpha = self.alpha;

        apply_link_springs(
            &mut self.bodies,
            &self.springs,
            self.params.link_distance,
            alpha,
        );
        self.apply_charge(alpha);
        self.apply_collisions();
        let mut moved = self.integrate();
        moved |= self.apply_centering();

        let after = self.energy_state();
        if after != before {
            debug!(
                "layout energy {} -> {} after {} ticks (alpha {:.4})",
                before.label(),
                after.label(),
                self.ticks,
                self.alpha
            );
        }
        moved
    }

    fn apply_charge(&mut self, alpha: f32) {
        let scaled_charge = self.params.charge * alpha;
        if scaled_charge == 0.0 || self.bodies.len() < 2 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch
            .positions
            .extend(self.bodies.iter().map(|body| body.position));
        let Some(tree) = QuadNode::build(&scratch.positions) else {
            return;
        };

        for (index, body) in self.bodies.iter_mut().enumerate() {
            let mut delta = Vec2::ZERO;
            accumulate_charge(
                &tree,
                index,
                &scratch.positions,
                scaled_charge,
                BARNES_HUT_THETA,
                &mut delta,
            );
            body.velocity += delta;
        }
    }

    fn apply_collisions(&mut self) {
        if self.bodies.len() < 2 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.predicted.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for body in &self.bodies {
            scratch.predicted.push(body.position + body.velocity);
            scratch.radii.push(body.radius);
            max_radius = max_radius.max(body.radius);
        }
        if max_radius <= 0.0 {
            return;
        }

        let Some(tree) = QuadNode::build(&scratch.predicted) else {
            return;
        };
        scratch.deltas.clear();
        scratch.deltas.resize(self.bodies.len(), Vec2::ZERO);

        let max_reach = max_radius * 2.0;
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.predicted,
            &scratch.radii,
            CollisionParams {
                strength: COLLIDE_STRENGTH,
                max_reach_sq: max_reach * max_reach,
            },
            &mut scratch.deltas,
        );

        for (body, delta) in self.bodies.iter_mut().zip(&scratch.deltas) {
            body.velocity += *delta;
        }
    }

    fn integrate(&mut self) -> bool {
        let mut moved = false;
        let center = self.params.center;
        for body in &mut self.bodies {
            if let Some(pin) = body.pinned {
                moved |= (body.position - pin).length_sq() > MOTION_EPSILON_SQ;
                body.position = pin;
                body.velocity = Vec2::ZERO;
                continue;
            }

            body.velocity *= 1.0 - VELOCITY_DECAY;
            if !body.velocity.is_finite() {
                body.velocity = Vec2::ZERO;
            }
            body.position += body.velocity;
            if !body.position.is_finite() {
                body.position = center;
                body.velocity = Vec2::ZERO;
            }
            moved |= body.velocity.length_sq() > MOTION_EPSILON_SQ;
        }
        moved
    }

    fn apply_centering(&mut self) -> bool {
        if self.bodies.is_empty() {
            return false;
        }

        let centroid = self
            .bodies
            .iter()
            .fold(Vec2::ZERO, |sum, body| sum + body.position)
            / self.bodies.len() as f32;
        let shift = (centroid - self.params.center) * CENTER_STRENGTH;
        if !shift.is_finite() || shift.length_sq() <= MOTION_EPSILON_SQ {
            return false;
        }

        for body in &mut self.bodies {
            if body.pinned.is_none() {
                body.position -= shift;
            }
        }
        true
    }
}

fn phyllotaxis(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_SPREAD * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(angle.cos(), angle.sin()) * radius
}

fn link_springs(graph: &RenderGraph) -> Vec<LinkSpring> {
    let degrees = graph.degrees();
    graph
        .links()
        .filter(|link| link.source != link.target)
        .map(|link| {
            let source_degree = degrees[link.source].max(1) as f32;
            let target_degree = degrees[link.target].max(1) as f32;
            LinkSpring {
                source: link.source,
                target: link.target,
                strength: (1.0 / source_degree.min(target_degree)).min(MAX_LINK_STRENGTH),
                bias: source_degree / (source_degree + target_degree),
            }
        })
        .collect()
}
