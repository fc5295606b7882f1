use std::collections::HashMap;

use log::debug;

use crate::family::Dataset;

use super::{EdgeKind, NodeKey, PersonNode, RenderEdge, RenderGraph, RenderNode, UnionNode};

impl RenderGraph {
    pub fn build(dataset: &Dataset) -> Self {
        let mut nodes = Vec::with_capacity(dataset.people.len() + dataset.unions.len());
        for person in &dataset.people {
            nodes.push(RenderNode::Person(PersonNode {
                id: person.id.clone(),
                name: person.name.clone(),
                sex: person.sex,
                notes: person.notes.clone(),
            }));
        }
        for union in &dataset.unions {
            nodes.push(RenderNode::Union(UnionNode {
                id: union.id.clone(),
                partner_a: union.partner_a.clone(),
                partner_b: union.partner_b.clone(),
                notes: union.notes.clone(),
            }));
        }

        let mut index_by_key = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_key.entry(node.key()).or_insert(index);
        }

        let mut children_by_union: HashMap<&str, Vec<&str>> = HashMap::new();
        for link in &dataset.child_links {
            children_by_union
                .entry(link.union_id.as_str())
                .or_default()
                .push(link.child_id.as_str());
        }

        let mut edges =
            Vec::with_capacity(dataset.unions.len() * 2 + dataset.child_links.len());
        for union in &dataset.unions {
            for partner in [&union.partner_a, &union.partner_b] {
                edges.push(RenderEdge {
                    source: NodeKey::person(partner.clone()),
                    target: NodeKey::union(union.id.clone()),
                    kind: EdgeKind::Partner,
                });
            }

            let Some(children) = children_by_union.remove(union.id.as_str()) else {
                continue;
            };
            for child in children {
                edges.push(RenderEdge {
                    source: NodeKey::union(union.id.clone()),
                    target: NodeKey::person(child),
                    kind: EdgeKind::Child,
                });
            }
        }

        for link in &dataset.child_links {
            if children_by_union.contains_key(link.union_id.as_str()) {
                edges.push(RenderEdge {
                    source: NodeKey::union(link.union_id.clone()),
                    target: NodeKey::person(link.child_id.clone()),
                    kind: EdgeKind::Child,
                });
            }
        }

        let endpoints = edges
            .iter()
            .map(|edge| {
                let source = index_by_key.get(&edge.source)?;
                let target = index_by_key.get(&edge.target)?;
                Some((*source, *target))
            })
            .collect::<Vec<_>>();

        let graph = Self {
            nodes,
            edges,
            endpoints,
            index_by_key,
        };

        debug!(
            "built render graph: {} nodes, {} edges ({} unresolved)",
            graph.node_count(),
            graph.edge_count(),
            graph.unresolved_edge_count()
        );
        graph
    }
}
