use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::QuadNode;

/// Squared distances below this are treated as this, which bounds the impulse between
/// nearly coincident nodes.
const MIN_DISTANCE_SQ: f32 = 1.0;
const COINCIDENT_EPSILON_SQ: f32 = 1e-8;

pub(super) fn separation_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

#[derive(Clone, Copy)]
pub(super) struct LinkSpring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

pub(super) fn apply_link_springs(
    bodies: &mut [Body],
    springs: &[LinkSpring],
    distance: f32,
    alpha: f32,
) {
    for spring in springs {
        let source = bodies[spring.source];
        let target = bodies[spring.target];

        let mut offset = (target.position + target.velocity) - (source.position + source.velocity);
        if offset.length_sq() <= COINCIDENT_EPSILON_SQ {
            offset = separation_direction(spring.source, spring.target) * 1e-3;
        }
        let length = offset.length();
        let correction = offset * ((length - distance) / length * alpha * spring.strength);

        bodies[spring.target].velocity -= correction * spring.bias;
        bodies[spring.source].velocity += correction * (1.0 - spring.bias);
    }
}

fn charge_between(point: Vec2, other: Vec2, scaled_charge: f32, from: usize, to: usize) -> Vec2 {
    let mut offset = other - point;
    if offset.length_sq() <= COINCIDENT_EPSILON_SQ {
        let direction = separation_direction(from.min(to), from.max(to));
        offset = if from < to { direction } else { -direction } * 1e-2;
    }
    offset * (scaled_charge / offset.length_sq().max(MIN_DISTANCE_SQ))
}

pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    scaled_charge: f32,
    theta: f32,
    delta: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    if node.is_leaf() {
        for &other in &node.indices {
            if other != index {
                *delta += charge_between(point, positions[other], scaled_charge, index, other);
            }
        }
        return;
    }

    let offset = node.center_of_mass - point;
    let distance_sq = offset.length_sq();
    let side = node.bounds.side_length();
    if !node.bounds.contains(point) && side * side < theta * theta * distance_sq {
        *delta += offset * (scaled_charge * node.mass / distance_sq.max(MIN_DISTANCE_SQ));
        return;
    }

    for child in node.children() {
        accumulate_charge(child, index, positions, scaled_charge, theta, delta);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) max_reach_sq: f32,
}

fn separate_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    if reach <= 0.0 {
        return;
    }

    let offset = positions[from] - positions[to];
    let distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    let (direction, distance) = if distance_sq > COINCIDENT_EPSILON_SQ {
        let distance = distance_sq.sqrt();
        (offset / distance, distance)
    } else {
        (separation_direction(from, to), 0.0)
    };

    let push = direction * ((reach - distance) * params.strength);
    let from_weight = radii[from] * radii[from];
    let to_weight = radii[to] * radii[to];
    let from_share = to_weight / (from_weight + to_weight);
    deltas[from] += push * from_share;
    deltas[to] -= push * (1.0 - from_share);
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if node_a.bounds.gap_sq(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    separate_pair(from, to, positions, radii, params, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    separate_pair(from, to, positions, radii, params, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, deltas);
            for child_b in &children[first + 1..] {
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, params, deltas,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, deltas);
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, deltas);
        }
    }
}
