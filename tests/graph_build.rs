use pretty_assertions::assert_eq;

use stemma::family::{ChildLink, Dataset, Person, Sex, Union, sample_dataset};
use stemma::graph::{EdgeKind, NodeKey, NodeKind, RenderGraph};

fn couple_with_child() -> Dataset {
    Dataset {
        people: vec![
            Person::new("a", "Alpha", Sex::Male),
            Person::new("b", "Beta", Sex::Female),
            Person::new("c", "Gamma", Sex::Unknown),
        ],
        unions: vec![Union::new("u1", "a", "b")],
        child_links: vec![ChildLink::new("u1", "c")],
    }
}

#[test]
fn one_node_per_person_and_union() {
    let dataset = sample_dataset().expect("bundled sample parses");
    let graph = RenderGraph::build(&dataset);

    assert_eq!(
        graph.node_count(),
        dataset.people.len() + dataset.unions.len()
    );
    assert_eq!(
        graph.edge_count(),
        dataset.unions.len() * 2 + dataset.child_links.len()
    );
    assert_eq!(graph.unresolved_edge_count(), 0);

    // Ptolemy II sits in two unions and is a child of a third, yet appears once.
    let ptolemy = NodeKey::person("ptolemy-2");
    let occurrences = graph
        .nodes()
        .iter()
        .filter(|node| node.key() == ptolemy)
        .count();
    assert_eq!(occurrences, 1);
}

#[test]
fn union_contributes_partner_edges_then_child_edges() {
    let graph = RenderGraph::build(&couple_with_child());

    let edges = graph
        .edges()
        .iter()
        .map(|edge| (edge.source.to_string(), edge.target.to_string(), edge.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        edges,
        vec![
            ("person:a".to_owned(), "union:u1".to_owned(), EdgeKind::Partner),
            ("person:b".to_owned(), "union:u1".to_owned(), EdgeKind::Partner),
            ("union:u1".to_owned(), "person:c".to_owned(), EdgeKind::Child),
        ]
    );
    assert_eq!(graph.degrees(), vec![1, 1, 1, 3]);
}

#[test]
fn missing_partner_yields_unresolved_edge() {
    let mut dataset = couple_with_child();
    dataset.unions.push(Union::new("u2", "a", "ghost"));
    let graph = RenderGraph::build(&dataset);

    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.unresolved_edge_count(), 1);
    let dangling = graph
        .edges()
        .iter()
        .position(|edge| edge.source == NodeKey::person("ghost"))
        .expect("edge to the missing partner is kept");
    assert!(!graph.is_resolved(dangling));
    assert_eq!(graph.links().count(), 4);
}

#[test]
fn child_link_to_missing_union_is_appended_last() {
    let mut dataset = couple_with_child();
    dataset.child_links.insert(0, ChildLink::new("nowhere", "c"));
    let graph = RenderGraph::build(&dataset);

    let last = graph.edges().last().expect("edges exist");
    assert_eq!(last.source, NodeKey::union("nowhere"));
    assert_eq!(last.kind, EdgeKind::Child);
    assert!(!graph.is_resolved(graph.edge_count() - 1));
}

#[test]
fn person_and_union_sharing_an_id_stay_distinct() {
    let dataset = Dataset {
        people: vec![
            Person::new("x", "Xeno", Sex::Male),
            Person::new("y", "Ypsi", Sex::Female),
        ],
        unions: vec![Union::new("x", "x", "y")],
        child_links: Vec::new(),
    };
    let graph = RenderGraph::build(&dataset);

    assert_eq!(graph.node_count(), 3);
    let person = graph.index_of(&NodeKey::person("x")).expect("person node");
    let union = graph.index_of(&NodeKey::union("x")).expect("union node");
    assert_ne!(person, union);
    assert_eq!(graph.nodes()[union].kind(), NodeKind::Union);
    assert_eq!(graph.unresolved_edge_count(), 0);
}

#[test]
fn empty_store_builds_empty_graph() {
    let graph = RenderGraph::build(&Dataset::default());
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
