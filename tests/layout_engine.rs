use eframe::egui::{Vec2, vec2};
use pretty_assertions::assert_eq;

use stemma::family::{ChildLink, Dataset, Person, Sex, Union, sample_dataset};
use stemma::graph::{NodeKey, RenderGraph};
use stemma::physics::{EnergyState, ForceParams, LayoutCommand, LayoutEngine};

const TICK_LIMIT: usize = 2_000;

fn couple() -> Dataset {
    Dataset {
        people: vec![
            Person::new("a", "Alpha", Sex::Male),
            Person::new("b", "Beta", Sex::Female),
        ],
        unions: vec![Union::new("u1", "a", "b")],
        child_links: Vec::new(),
    }
}

fn run_until_settled(engine: &mut LayoutEngine) {
    for _ in 0..TICK_LIMIT {
        if engine.energy_state() == EnergyState::Settled {
            return;
        }
        engine.tick();
    }
    panic!("layout did not settle within {TICK_LIMIT} ticks");
}

fn snapshot(engine: &LayoutEngine) -> Vec<(NodeKey, Vec2)> {
    engine
        .positions()
        .map(|(key, position)| (key.clone(), position))
        .collect()
}

fn mean_link_length(graph: &RenderGraph, engine: &LayoutEngine) -> f32 {
    let lengths = graph
        .links()
        .filter_map(|link| {
            let source = engine.position_at(link.source)?;
            let target = engine.position_at(link.target)?;
            Some((target - source).length())
        })
        .collect::<Vec<_>>();
    lengths.iter().sum::<f32>() / lengths.len() as f32
}

#[test]
fn pinned_node_stays_exactly_in_place() {
    let graph = RenderGraph::build(&sample_dataset().expect("sample"));
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    let key = NodeKey::person("ptolemy-2");
    let pin = vec2(300.0, -200.0);

    engine.apply(LayoutCommand::Pin {
        key: key.clone(),
        position: pin,
    });
    for _ in 0..120 {
        engine.tick();
        assert_eq!(engine.position(&key), Some(pin));
    }
    assert!(engine.is_pinned(&key));

    engine.apply(LayoutCommand::Unpin { key: key.clone() });
    engine.apply(LayoutCommand::Reheat);
    for _ in 0..60 {
        engine.tick();
    }
    assert!(!engine.is_pinned(&key));
    assert_ne!(engine.position(&key), Some(pin));
}

#[test]
fn link_distance_sets_the_resting_link_length() {
    let graph = RenderGraph::build(&couple());
    let measure = |link_distance: f32| {
        let params = ForceParams {
            link_distance,
            charge: 0.0,
            collide_radius: 0.0,
            center: Vec2::ZERO,
        };
        let mut engine = LayoutEngine::new(&graph, params);
        run_until_settled(&mut engine);
        mean_link_length(&graph, &engine)
    };

    let short = measure(40.0);
    let long = measure(160.0);
    assert!((short - 40.0).abs() < 10.0, "short links rest at {short}");
    assert!((long - 160.0).abs() < 40.0, "long links rest at {long}");
    assert!(long > short * 2.0);
}

#[test]
fn settled_layout_does_not_move() {
    let graph = RenderGraph::build(&sample_dataset().expect("sample"));
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    run_until_settled(&mut engine);

    let before = snapshot(&engine);
    for _ in 0..25 {
        assert!(!engine.tick());
    }
    assert_eq!(snapshot(&engine), before);
    assert_eq!(engine.energy_state(), EnergyState::Settled);
}

#[test]
fn energy_follows_heat_and_cool() {
    let graph = RenderGraph::build(&couple());
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    assert_eq!(engine.energy_state(), EnergyState::Running);
    run_until_settled(&mut engine);

    engine.apply(LayoutCommand::Heat);
    for _ in 0..500 {
        engine.tick();
    }
    assert_eq!(engine.energy_state(), EnergyState::Running);
    assert!(engine.alpha() >= 0.29);

    engine.apply(LayoutCommand::Cool);
    engine.tick();
    assert_eq!(engine.energy_state(), EnergyState::Cooling);
    run_until_settled(&mut engine);
}

#[test]
fn reconfigure_restarts_relaxation_with_new_params() {
    let graph = RenderGraph::build(&couple());
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    run_until_settled(&mut engine);

    let params = ForceParams {
        link_distance: 200.0,
        ..ForceParams::default()
    };
    engine.apply(LayoutCommand::Reconfigure(params));
    assert_eq!(engine.params(), params);
    assert_eq!(engine.alpha(), 1.0);
    assert_eq!(engine.node_count(), 3);
}

#[test]
fn rebuild_carries_positions_and_pins_by_key() {
    let mut dataset = couple();
    let graph = RenderGraph::build(&dataset);
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    for _ in 0..30 {
        engine.tick();
    }
    let a = NodeKey::person("a");
    engine.apply(LayoutCommand::Pin {
        key: a.clone(),
        position: vec2(50.0, 50.0),
    });
    let b_before = engine.position(&NodeKey::person("b"));

    dataset.people.push(Person::new("c", "Gamma", Sex::Unknown));
    dataset.child_links.push(ChildLink::new("u1", "c"));
    let graph = RenderGraph::build(&dataset);
    let engine = engine.rebuild(&graph);

    assert_eq!(engine.node_count(), 4);
    assert_eq!(engine.position(&a), Some(vec2(50.0, 50.0)));
    assert!(engine.is_pinned(&a));
    assert_eq!(engine.position(&NodeKey::person("b")), b_before);

    // New nodes start next to a placed neighbour.
    let union = engine.position(&NodeKey::union("u1")).expect("union placed");
    let child = engine.position(&NodeKey::person("c")).expect("child placed");
    let gap = (child - union).length();
    assert!(gap > 1.0 && gap <= ForceParams::default().link_distance * 0.5 + 0.01);
}

#[test]
fn non_finite_pins_and_unknown_keys_are_ignored() {
    let graph = RenderGraph::build(&couple());
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    let a = NodeKey::person("a");
    let before = engine.position(&a);

    engine.apply(LayoutCommand::Pin {
        key: a.clone(),
        position: vec2(f32::NAN, 0.0),
    });
    engine.apply(LayoutCommand::Pin {
        key: NodeKey::person("ghost"),
        position: Vec2::ZERO,
    });
    assert_eq!(engine.position(&a), before);
    assert_eq!(engine.pinned_count(), 0);
}

#[test]
fn cycles_self_unions_and_coincident_nodes_stay_finite() {
    let dataset = Dataset {
        people: vec![
            Person::new("a", "Alpha", Sex::Male),
            Person::new("b", "Beta", Sex::Female),
        ],
        unions: vec![Union::new("u-self", "a", "a"), Union::new("u2", "a", "b")],
        child_links: vec![ChildLink::new("u-self", "a"), ChildLink::new("u2", "a")],
    };
    let graph = RenderGraph::build(&dataset);
    let mut engine = LayoutEngine::new(&graph, ForceParams::default());
    for key in [NodeKey::person("a"), NodeKey::person("b")] {
        engine.apply(LayoutCommand::Pin {
            key,
            position: Vec2::ZERO,
        });
    }
    engine.apply(LayoutCommand::UnpinAll);

    for _ in 0..400 {
        engine.tick();
    }
    for (key, position) in engine.positions() {
        assert!(position.is_finite(), "{key} drifted to {position:?}");
    }
    assert_ne!(
        engine.position(&NodeKey::person("a")),
        engine.position(&NodeKey::person("b"))
    );
}

#[test]
fn empty_graph_never_moves() {
    let mut engine = LayoutEngine::new(&RenderGraph::default(), ForceParams::default());
    assert!(!engine.tick());
    assert_eq!(engine.node_count(), 0);
}
