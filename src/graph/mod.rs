use std::collections::HashMap;
use std::fmt;

use crate::family::Sex;

mod build;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Person,
    Union,
}

/// Identity of a render node. Kind is part of the key, so a person and a union sharing an
/// id stay two distinct nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub id: String,
}

impl NodeKey {
    pub fn person(id: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Person,
            id: id.into(),
        }
    }

    pub fn union(id: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Union,
            id: id.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Person => write!(f, "person:{}", self.id),
            NodeKind::Union => write!(f, "union:{}", self.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonNode {
    pub id: String,
    pub name: String,
    pub sex: Sex,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionNode {
    pub id: String,
    pub partner_a: String,
    pub partner_b: String,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderNode {
    Person(PersonNode),
    Union(UnionNode),
}

impl RenderNode {
    pub fn key(&self) -> NodeKey {
        match self {
            Self::Person(person) => NodeKey::person(person.id.clone()),
            Self::Union(union) => NodeKey::union(union.id.clone()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Person(_) => NodeKind::Person,
            Self::Union(_) => NodeKind::Union,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Person(person) => &person.id,
            Self::Union(union) => &union.id,
        }
    }

    pub fn notes(&self) -> &str {
        match self {
            Self::Person(person) => &person.notes,
            Self::Union(union) => &union.notes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Partner,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderEdge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub kind: EdgeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default)]
pub struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    endpoints: Vec<Option<(usize, usize)>>,
    index_by_key: HashMap<NodeKey, usize>,
}

impl RenderGraph {
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, key: &NodeKey) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }

    pub fn node(&self, key: &NodeKey) -> Option<&RenderNode> {
        self.index_of(key).and_then(|index| self.nodes.get(index))
    }

    pub fn endpoints(&self, edge_index: usize) -> Option<(usize, usize)> {
        self.endpoints.get(edge_index).copied().flatten()
    }

    pub fn is_resolved(&self, edge_index: usize) -> bool {
        self.endpoints(edge_index).is_some()
    }

    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.edges
            .iter()
            .zip(&self.endpoints)
            .filter_map(|(edge, endpoints)| {
                endpoints.map(|(source, target)| Link {
                    source,
                    target,
                    kind: edge.kind,
                })
            })
    }

    pub fn unresolved_edge_count(&self) -> usize {
        self.endpoints
            .iter()
            .filter(|endpoints| endpoints.is_none())
            .count()
    }

    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for link in self.links() {
            if link.source == link.target {
                continue;
            }
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }
        degrees
    }

    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.links().filter_map(move |link| {
            if link.source == index && link.target != index {
                Some(link.target)
            } else if link.target == index && link.source != index {
                Some(link.source)
            } else {
                None
            }
        })
    }
}
