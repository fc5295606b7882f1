use eframe::egui::{Rect, pos2, vec2};
use pretty_assertions::assert_eq;

use stemma::graph::NodeKey;
use stemma::interaction::{InteractionController, ViewTransform};
use stemma::physics::LayoutCommand;

fn drain(controller: &mut InteractionController) -> Vec<LayoutCommand> {
    controller.drain_commands().collect()
}

#[test]
fn drag_heats_pins_then_cools_and_releases() {
    let mut controller = InteractionController::new(false);
    let key = NodeKey::person("a");

    controller.begin_drag(key.clone(), vec2(1.0, 2.0));
    assert_eq!(controller.dragging(), Some(&key));
    assert_eq!(
        drain(&mut controller),
        vec![
            LayoutCommand::Heat,
            LayoutCommand::Pin {
                key: key.clone(),
                position: vec2(1.0, 2.0),
            },
        ]
    );

    controller.continue_drag(&key, vec2(1.0, 2.0));
    assert!(!controller.has_pending());
    controller.continue_drag(&key, vec2(5.0, 6.0));
    assert_eq!(
        drain(&mut controller),
        vec![LayoutCommand::Pin {
            key: key.clone(),
            position: vec2(5.0, 6.0),
        }]
    );

    controller.end_drag(&key);
    assert_eq!(controller.dragging(), None);
    assert_eq!(
        drain(&mut controller),
        vec![LayoutCommand::Cool, LayoutCommand::Unpin { key }]
    );
}

#[test]
fn locking_keeps_the_pin_after_release() {
    let mut controller = InteractionController::new(true);
    let key = NodeKey::union("u1");
    controller.begin_drag(key.clone(), vec2(0.0, 0.0));
    drain(&mut controller);

    controller.end_drag(&key);
    assert_eq!(drain(&mut controller), vec![LayoutCommand::Cool]);
}

#[test]
fn gestures_for_other_nodes_are_ignored() {
    let mut controller = InteractionController::new(false);
    let dragged = NodeKey::person("a");
    let other = NodeKey::person("b");
    controller.begin_drag(dragged.clone(), vec2(0.0, 0.0));
    drain(&mut controller);

    controller.continue_drag(&other, vec2(3.0, 3.0));
    controller.end_drag(&other);
    assert!(!controller.has_pending());
    assert_eq!(controller.dragging(), Some(&dragged));
}

#[test]
fn a_new_drag_releases_the_previous_one() {
    let mut controller = InteractionController::new(false);
    let first = NodeKey::person("a");
    let second = NodeKey::person("b");
    controller.begin_drag(first.clone(), vec2(0.0, 0.0));
    drain(&mut controller);

    controller.begin_drag(second.clone(), vec2(9.0, 9.0));
    assert_eq!(
        drain(&mut controller),
        vec![
            LayoutCommand::Cool,
            LayoutCommand::Unpin { key: first },
            LayoutCommand::Heat,
            LayoutCommand::Pin {
                key: second,
                position: vec2(9.0, 9.0),
            },
        ]
    );
}

#[test]
fn vanished_nodes_drop_out_of_drag_and_selection() {
    let mut controller = InteractionController::new(false);
    let key = NodeKey::person("a");
    controller.select(Some(key.clone()));
    controller.begin_drag(key.clone(), vec2(0.0, 0.0));
    drain(&mut controller);

    controller.retain_nodes(|candidate| candidate != &key);
    assert_eq!(controller.selected(), None);
    assert_eq!(controller.dragging(), None);
    assert_eq!(drain(&mut controller), vec![LayoutCommand::Cool]);
}

#[test]
fn zoom_is_clamped_and_anchored_at_the_pointer() {
    let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
    let mut view = ViewTransform::default();
    let pointer = pos2(620.0, 140.0);
    let anchored = view.screen_to_world(rect, pointer);

    view.zoom_about(rect, pointer, 1.5);
    assert_eq!(view.zoom(), 1.5);
    let after = view.world_to_screen(rect, anchored);
    assert!((after - pointer).length() < 1e-3);

    for _ in 0..50 {
        view.zoom_about(rect, pointer, 1.5);
    }
    assert_eq!(view.zoom(), 3.0);
    for _ in 0..100 {
        view.zoom_about(rect, pointer, 0.5);
    }
    assert_eq!(view.zoom(), 0.1);

    view.reset();
    assert_eq!(view.zoom(), 1.0);
    assert_eq!(view.pan(), vec2(0.0, 0.0));
}

#[test]
fn fit_centers_the_bounds() {
    let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
    let bounds = Rect::from_min_max(pos2(100.0, 100.0), pos2(300.0, 200.0));
    let mut view = ViewTransform::default();

    view.fit(rect.size(), bounds, 0.0);
    assert_eq!(view.zoom(), 3.0);
    let center = view.world_to_screen(rect, bounds.center().to_vec2());
    assert!((center - rect.center()).length() < 1e-3);
}
