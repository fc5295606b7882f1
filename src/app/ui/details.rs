use eframe::egui::{RichText, Ui};

use crate::graph::{NodeKey, NodeKind};

use super::super::ViewModel;

enum DetailsAction {
    Select(NodeKey),
    Unpin(NodeKey),
    RemoveChildLink { union_id: String, child_id: String },
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(key) = self.session.selected().cloned() else {
            ui.label("Click a node in the graph or a name in the editor.");
            return;
        };

        let mut action = None;
        let dataset = self.session.dataset();

        match key.kind {
            NodeKind::Person => {
                let Some(person) = dataset.person(&key.id) else {
                    ui.label("Selected person no longer exists.");
                    return;
                };
                ui.label(RichText::new(person.display_name()).strong());
                ui.small(person.id.as_str());
                ui.label(format!("Sex: {}", person.sex.label()));
                if !person.notes.trim().is_empty() {
                    ui.label(format!("Notes: {}", person.notes));
                }

                ui.separator();
                ui.label(RichText::new("Parents").strong());
                let mut any_parent = false;
                for union_id in dataset.parent_unions_of(&person.id) {
                    any_parent = true;
                    let text = match dataset.union(union_id) {
                        Some(union) => format!(
                            "{} + {}",
                            dataset.person_name(&union.partner_a),
                            dataset.person_name(&union.partner_b)
                        ),
                        None => format!("{union_id} (missing union)"),
                    };
                    if ui.link(text).clicked() {
                        action = Some(DetailsAction::Select(NodeKey::union(union_id)));
                    }
                }
                if !any_parent {
                    ui.label("none recorded");
                }

                ui.label(RichText::new("Unions").strong());
                let mut any_union = false;
                for union in dataset.unions_of(&person.id) {
                    any_union = true;
                    let partner = if union.partner_a == person.id {
                        &union.partner_b
                    } else {
                        &union.partner_a
                    };
                    let children = dataset.children_of(&union.id).count();
                    let text = format!(
                        "with {}  ({children} child(ren))",
                        dataset.person_name(partner)
                    );
                    if ui.link(text).clicked() {
                        action = Some(DetailsAction::Select(NodeKey::union(&union.id)));
                    }
                }
                if !any_union {
                    ui.label("none recorded");
                }
            }
            NodeKind::Union => {
                let Some(union) = dataset.union(&key.id) else {
                    ui.label("Selected union no longer exists.");
                    return;
                };
                ui.label(RichText::new(format!("Union {}", union.id)).strong());
                for partner in [&union.partner_a, &union.partner_b] {
                    let text = if dataset.person(partner).is_some() {
                        dataset.person_name(partner).to_owned()
                    } else {
                        format!("{partner} (missing person)")
                    };
                    if ui.link(text).clicked() {
                        action = Some(DetailsAction::Select(NodeKey::person(partner)));
                    }
                }
                if !union.notes.trim().is_empty() {
                    ui.label(format!("Notes: {}", union.notes));
                }

                ui.separator();
                ui.label(RichText::new("Children").strong());
                let mut any_child = false;
                for child_id in dataset.children_of(&union.id) {
                    any_child = true;
                    ui.horizontal(|ui| {
                        if ui.small_button("x").on_hover_text("Remove child link").clicked() {
                            action = Some(DetailsAction::RemoveChildLink {
                                union_id: union.id.clone(),
                                child_id: child_id.to_owned(),
                            });
                        }
                        if ui.link(dataset.person_name(child_id)).clicked() {
                            action = Some(DetailsAction::Select(NodeKey::person(child_id)));
                        }
                    });
                }
                if !any_child {
                    ui.label("none recorded");
                }
            }
        }

        ui.separator();
        let engine = self.session.engine();
        if let Some(position) = engine.position(&key) {
            ui.label(format!("Position: ({:.0}, {:.0})", position.x, position.y));
        }
        if engine.is_pinned(&key) {
            ui.horizontal(|ui| {
                ui.label("Pinned");
                if ui.button("Unpin").clicked() {
                    action = Some(DetailsAction::Unpin(key.clone()));
                }
            });
        }

        match action {
            Some(DetailsAction::Select(key)) => self.session.select(Some(key)),
            Some(DetailsAction::Unpin(key)) => self.session.unpin(key),
            Some(DetailsAction::RemoveChildLink { union_id, child_id }) => {
                match self
                    .session
                    .edit(|dataset| dataset.remove_child_link(&union_id, &child_id))
                {
                    Ok(()) => {
                        self.persist_dataset(format!("Unlinked `{child_id}` from `{union_id}`"));
                    }
                    Err(error) => self.set_error(error.to_string()),
                }
            }
            None => {}
        }
    }
}
