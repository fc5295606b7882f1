use eframe::egui::vec2;
use pretty_assertions::assert_eq;

use stemma::Session;
use stemma::family::{ChildLink, Dataset, Person, Sex, Union, sample_dataset};
use stemma::graph::{EdgeKind, NodeKey};
use stemma::scene::{Glyph, bracketed};
use stemma::settings::LayoutSettings;

fn small_family() -> Dataset {
    Dataset {
        people: vec![
            Person::new("p2", "Ptolemy II", Sex::Male),
            Person::new("a2", "Arsinoe II", Sex::Female).with_notes("Queen"),
            Person::new("m", "Magas", Sex::Unknown),
        ],
        unions: vec![Union::new("u", "p2", "a2")],
        child_links: vec![ChildLink::new("u", "m")],
    }
}

fn label_of(session: &Session, key: &NodeKey) -> String {
    let node = session
        .scene()
        .nodes()
        .iter()
        .find(|node| &node.key == key)
        .expect("node drawn");
    bracketed(&node.label)
}

#[test]
fn search_marks_the_matching_substring() {
    let mut session = Session::new(small_family(), LayoutSettings::default());
    session.set_search("ptol");
    session.refresh_scene();

    assert_eq!(label_of(&session, &NodeKey::person("p2")), "[Ptol]emy II");
    assert_eq!(label_of(&session, &NodeKey::person("a2")), "Arsinoe II");
    assert_eq!(session.scene().search_hits(), 1);

    session.set_search("xyz");
    session.refresh_scene();
    assert_eq!(session.scene().search_hits(), 0);
    assert!(session.scene().nodes().iter().all(|node| {
        node.label.iter().all(|span| !span.matched)
    }));
}

#[test]
fn redraw_replaces_instead_of_accumulating() {
    let mut session = Session::new(sample_dataset().expect("sample"), LayoutSettings::default());
    let nodes = session.graph().node_count();
    let edges = session.graph().edge_count();

    for _ in 0..40 {
        session.tick();
        assert_eq!(session.scene().nodes().len(), nodes);
        assert_eq!(session.scene().edges().len(), edges);
    }
    assert!(session.scene().redraws() > 1);
}

#[test]
fn glyphs_follow_kind_and_sex() {
    let session = Session::new(small_family(), LayoutSettings::default());
    let glyph = |key: NodeKey| {
        session
            .scene()
            .nodes()
            .iter()
            .find(|node| node.key == key)
            .map(|node| node.glyph)
    };

    assert_eq!(glyph(NodeKey::person("p2")), Some(Glyph::RoundedRect));
    assert_eq!(glyph(NodeKey::person("a2")), Some(Glyph::Ellipse));
    assert_eq!(glyph(NodeKey::person("m")), Some(Glyph::Neutral));
    assert_eq!(glyph(NodeKey::union("u")), Some(Glyph::Diamond));

    // Unions are painted first so persons sit on top.
    assert_eq!(session.scene().nodes()[0].key, NodeKey::union("u"));
}

#[test]
fn only_child_edges_carry_arrowheads() {
    let mut session = Session::new(small_family(), LayoutSettings::default());
    for _ in 0..400 {
        session.tick();
    }
    assert_eq!(session.scene().edges().len(), 3);
    for edge in session.scene().edges() {
        match edge.kind {
            EdgeKind::Partner => assert!(edge.arrow.is_none()),
            EdgeKind::Child => assert!(edge.arrow.is_some()),
        }
    }
}

#[test]
fn label_and_note_toggles_only_change_the_drawing() {
    let mut session = Session::new(small_family(), LayoutSettings::default());
    let queen = NodeKey::person("a2");
    let notes_of = |session: &Session| {
        session
            .scene()
            .nodes()
            .iter()
            .find(|node| node.key == queen)
            .and_then(|node| node.notes.clone())
    };
    assert_eq!(notes_of(&session), None);

    let alpha = session.engine().alpha();
    session.update_settings(LayoutSettings {
        show_labels: false,
        show_notes: true,
        ..LayoutSettings::default()
    });
    session.refresh_scene();

    assert_eq!(session.engine().alpha(), alpha);
    assert_eq!(notes_of(&session), Some("Queen".to_owned()));
    assert!(session.scene().nodes().iter().all(|node| node.label.is_empty()));

    // Search highlighting still reports hits while labels are hidden.
    session.set_search("magas");
    session.refresh_scene();
    assert_eq!(session.scene().search_hits(), 1);
}

#[test]
fn svg_export_draws_every_glyph_kind() {
    let mut session = Session::new(small_family(), LayoutSettings::default());
    session.set_search("ptol");
    for _ in 0..50 {
        session.tick();
    }
    let viewport = vec2(640.0, 480.0);
    session.fit_view(viewport);
    let svg = session.export_svg(viewport);

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("width=\"640\""));
    assert!(svg.contains("<ellipse"));
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("rx=\"6.00\""));
    assert!(svg.contains("rx=\"0.00\""));
    assert!(svg.contains("<tspan class=\"match\""));
    assert!(svg.contains(">Ptol</tspan>"));
    assert!(svg.contains("data-id=\"union:u\""));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn svg_export_hides_text_the_canvas_would_hide() {
    let mut session = Session::new(
        small_family(),
        LayoutSettings {
            show_notes: true,
            ..LayoutSettings::default()
        },
    );
    session.refresh_scene();
    let viewport = vec2(640.0, 480.0);

    session.view_mut().set(vec2(0.0, 0.0), 1.0);
    let near = session.export_svg(viewport);
    assert!(near.contains(">Queen</text>"));
    assert!(near.contains("<tspan>Magas</tspan>"));

    session.view_mut().set(vec2(0.0, 0.0), 0.2);
    let far = session.export_svg(viewport);
    assert!(!far.contains("<text"));
    assert!(far.contains("<ellipse"));
}

#[test]
fn hit_test_finds_the_node_under_a_world_point() {
    let session = Session::new(small_family(), LayoutSettings::default());
    let key = NodeKey::person("m");
    let center = session.engine().position(&key).expect("placed");

    assert_eq!(session.hit_test(center), Some(key));
    assert_eq!(session.hit_test(center + vec2(10_000.0, 0.0)), None);
}
