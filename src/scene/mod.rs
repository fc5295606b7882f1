mod label;
pub mod style;
mod svg;

use eframe::egui::{Rect, Vec2, pos2, vec2};

use crate::family::Sex;
use crate::graph::{EdgeKind, NodeKey, RenderGraph, RenderNode};
use crate::physics::LayoutEngine;

pub use label::{LabelSpan, bracketed, find_match, highlight_spans};
pub use svg::render_svg;

pub const PERSON_HALF_SIZE: Vec2 = vec2(34.0, 15.0);
pub const UNION_HALF_SIZE: Vec2 = vec2(7.0, 7.0);
pub const ARROW_LENGTH: f32 = 9.0;
pub const ARROW_HALF_WIDTH: f32 = 4.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Diamond,
    RoundedRect,
    Ellipse,
    Neutral,
}

impl Glyph {
    pub fn for_node(node: &RenderNode) -> Self {
        match node {
            RenderNode::Union(_) => Self::Diamond,
            RenderNode::Person(person) => match person.sex {
                Sex::Male => Self::RoundedRect,
                Sex::Female => Self::Ellipse,
                Sex::Unknown => Self::Neutral,
            },
        }
    }

    pub fn half_size(self) -> Vec2 {
        match self {
            Self::Diamond => UNION_HALF_SIZE,
            Self::RoundedRect | Self::Ellipse | Self::Neutral => PERSON_HALF_SIZE,
        }
    }

    pub fn boundary_distance(self, direction: Vec2) -> f32 {
        let half = self.half_size();
        let (dx, dy) = (direction.x.abs(), direction.y.abs());
        match self {
            Self::Diamond => 1.0 / ((dx / half.x) + (dy / half.y)).max(f32::EPSILON),
            Self::Ellipse => {
                1.0 / ((dx / half.x).powi(2) + (dy / half.y).powi(2))
                    .sqrt()
                    .max(f32::EPSILON)
            }
            Self::RoundedRect | Self::Neutral => {
                let along_x = if dx > f32::EPSILON { half.x / dx } else { f32::INFINITY };
                let along_y = if dy > f32::EPSILON { half.y / dy } else { f32::INFINITY };
                along_x.min(along_y)
            }
        }
    }

    pub fn contains(self, offset: Vec2) -> bool {
        let half = self.half_size();
        let (dx, dy) = (offset.x.abs(), offset.y.abs());
        match self {
            Self::Diamond => (dx / half.x) + (dy / half.y) <= 1.0,
            Self::Ellipse => (dx / half.x).powi(2) + (dy / half.y).powi(2) <= 1.0,
            Self::RoundedRect | Self::Neutral => dx <= half.x && dy <= half.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneEdge {
    pub kind: EdgeKind,
    pub from: Vec2,
    pub to: Vec2,
    pub arrow: Option<[Vec2; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub key: NodeKey,
    pub glyph: Glyph,
    pub center: Vec2,
    pub selected: bool,
    pub pinned: bool,
    pub label: Vec<LabelSpan>,
    pub notes: Option<String>,
    pub search_hit: bool,
}

pub struct SceneInputs<'a> {
    pub graph: &'a RenderGraph,
    pub engine: &'a LayoutEngine,
    pub selected: Option<&'a NodeKey>,
    pub search: &'a str,
    pub show_labels: bool,
    pub show_notes: bool,
}

#[derive(Default)]
pub struct Scene {
    edges: Vec<SceneEdge>,
    nodes: Vec<SceneNode>,
    redraws: u64,
}

impl Scene {
    pub fn edges(&self) -> &[SceneEdge] {
        &self.edges
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn search_hits(&self) -> usize {
        self.nodes.iter().filter(|node| node.search_hit).count()
    }

    pub fn redraw(&mut self, inputs: &SceneInputs<'_>) {
        self.redraws += 1;
        self.edges.clear();
        self.nodes.clear();

        let graph = inputs.graph;
        let engine = inputs.engine;

        for (edge_index, edge) in graph.edges().iter().enumerate() {
            let Some((source, target)) = graph.endpoints(edge_index) else {
                continue;
            };
            let (Some(from), Some(center)) = (engine.position_at(source), engine.position_at(target))
            else {
                continue;
            };

            let offset = center - from;
            let length = offset.length();
            if !length.is_finite() || length <= f32::EPSILON {
                continue;
            }
            let direction = offset / length;

            let (to, arrow) = match edge.kind {
                EdgeKind::Partner => (center, None),
                EdgeKind::Child => {
                    let glyph = Glyph::for_node(&graph.nodes()[target]);
                    let inset = glyph.boundary_distance(direction);
                    if inset + ARROW_LENGTH >= length {
                        (center, None)
                    } else {
                        let tip = center - direction * inset;
                        let base = tip - direction * ARROW_LENGTH;
                        let wing = direction.rot90() * ARROW_HALF_WIDTH;
                        (tip, Some([tip, base + wing, base - wing]))
                    }
                }
            };

            self.edges.push(SceneEdge {
                kind: edge.kind,
                from,
                to,
                arrow,
            });
        }

        for pass_unions in [true, false] {
            for (index, node) in graph.nodes().iter().enumerate() {
                if matches!(node, RenderNode::Union(_)) != pass_unions {
                    continue;
                }
                let Some(center) = engine.position_at(index) else {
                    continue;
                };
                self.nodes.push(scene_node(inputs, index, node, center));
            }
        }
    }

    pub fn hit_test(&self, world: Vec2) -> Option<&NodeKey> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.glyph.contains(world - node.center))
            .map(|node| &node.key)
    }

    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for node in &self.nodes {
            let half = node.glyph.half_size();
            let rect = Rect::from_min_max(
                pos2(node.center.x - half.x, node.center.y - half.y),
                pos2(node.center.x + half.x, node.center.y + half.y),
            );
            bounds = Some(match bounds {
                Some(existing) => existing.union(rect),
                None => rect,
            });
        }
        bounds
    }
}

fn scene_node(inputs: &SceneInputs<'_>, index: usize, node: &RenderNode, center: Vec2) -> SceneNode {
    let key = node.key();
    let selected = inputs.selected == Some(&key);
    let pinned = inputs.engine.is_pinned_at(index);

    let (label, search_hit) = match node {
        RenderNode::Person(person) => {
            let text = if person.name.trim().is_empty() {
                person.id.as_str()
            } else {
                person.name.as_str()
            };
            let label = if inputs.show_labels {
                highlight_spans(text, inputs.search)
            } else {
                Vec::new()
            };
            (label, find_match(text, inputs.search).is_some())
        }
        RenderNode::Union(_) => (Vec::new(), false),
    };

    let notes = if inputs.show_notes && !node.notes().trim().is_empty() {
        Some(node.notes().to_owned())
    } else {
        None
    };

    SceneNode {
        key,
        glyph: Glyph::for_node(node),
        center,
        selected,
        pinned,
        label,
        notes,
        search_hit,
    }
}
