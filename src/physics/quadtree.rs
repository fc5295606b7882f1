use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: (span * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        (dx * dx) + (dy * dy)
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign_x = if quadrant & 1 == 0 { -1.0 } else { 1.0 };
        let sign_y = if quadrant & 2 == 0 { -1.0 } else { 1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half_extent: quarter,
        }
    }
}

pub(super) struct QuadNode {
    pub(super) bounds: Square,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let bounds = Square::enclosing(points)?;
        Some(Self::subdivide(bounds, (0..points.len()).collect(), points, 0))
    }

    fn subdivide(bounds: Square, indices: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let mass = indices.len() as f32;
        let center_of_mass = if indices.is_empty() {
            bounds.center
        } else {
            indices.iter().fold(Vec2::ZERO, |sum, &index| sum + points[index]) / mass
        };

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };
        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_of(points[index])].push(index);
        }
        // Coincident points never split apart; keep them in one leaf.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[quadrant] = Some(Box::new(Self::subdivide(
                bounds.quadrant(quadrant),
                bucket,
                points,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_indices(node: &QuadNode, out: &mut Vec<usize>) {
        out.extend(&node.indices);
        for child in node.children() {
            leaf_indices(child, out);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let points = (0..100)
            .map(|index| vec2((index % 10) as f32 * 13.0, (index / 10) as f32 * 7.0))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&points).unwrap();

        let mut seen = Vec::new();
        leaf_indices(&tree, &mut seen);
        seen.sort_unstable();

        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        assert_eq!(tree.mass, 100.0);
        assert!(!tree.is_leaf());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let points = vec![vec2(5.0, 5.0); 40];
        let tree = QuadNode::build(&points).unwrap();

        assert!(tree.is_leaf());
        assert_eq!(tree.indices.len(), 40);
    }

    #[test]
    fn non_finite_points_yield_no_tree() {
        assert!(QuadNode::build(&[vec2(0.0, 0.0), vec2(f32::NAN, 1.0)]).is_none());
        assert!(QuadNode::build(&[]).is_none());
    }

    #[test]
    fn gap_between_separated_squares() {
        let a = Square {
            center: vec2(0.0, 0.0),
            half_extent: 1.0,
        };
        let b = Square {
            center: vec2(5.0, 0.0),
            half_extent: 1.0,
        };
        assert_eq!(a.gap_sq(b), 9.0);
        assert_eq!(a.gap_sq(a), 0.0);
    }
}
