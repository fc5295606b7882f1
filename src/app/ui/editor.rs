use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::family::{ChildLink, Dataset, EditError, Person, Sex, Union};
use crate::graph::NodeKey;

use super::super::ViewModel;

const PICKER_ROWS: usize = 40;
const BROWSE_ROWS: usize = 200;

#[derive(Default)]
pub(in crate::app) struct EditorState {
    person_id: String,
    person_name: String,
    person_sex: Sex,
    person_notes: String,
    union_id: String,
    partner_a: String,
    partner_b: String,
    partner_a_filter: String,
    partner_b_filter: String,
    union_notes: String,
    link_union: String,
    link_child: String,
    link_union_filter: String,
    link_child_filter: String,
    browse_filter: String,
}

impl EditorState {
    pub(in crate::app) fn reset_forms(&mut self) {
        *self = Self::default();
    }
}

struct Choice {
    id: String,
    label: String,
}

enum EditorAction {
    AddPerson,
    AddUnion,
    AddChildLink,
    RemovePerson(String),
    RemoveUnion(String),
    Select(NodeKey),
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn rank_choices<'a>(choices: &'a [Choice], query: &str) -> Vec<&'a Choice> {
    let query = query.trim();
    if query.is_empty() {
        return choices.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = choices
        .iter()
        .filter_map(|choice| {
            let by_label = fuzzy_match_score(&matcher, &choice.label, query);
            let by_id = fuzzy_match_score(&matcher, &choice.id, query);
            by_label.max(by_id).map(|score| (score, choice))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, choice)| choice).collect()
}

fn person_choices(dataset: &Dataset) -> Vec<Choice> {
    dataset
        .people
        .iter()
        .map(|person| Choice {
            id: person.id.clone(),
            label: format!("{}  ({})", person.display_name(), person.id),
        })
        .collect()
}

fn union_choices(dataset: &Dataset) -> Vec<Choice> {
    dataset
        .unions
        .iter()
        .map(|union| Choice {
            id: union.id.clone(),
            label: format!(
                "{} + {}  ({})",
                dataset.person_name(&union.partner_a),
                dataset.person_name(&union.partner_b),
                union.id
            ),
        })
        .collect()
}

fn picker(
    ui: &mut Ui,
    id_salt: &str,
    selected: &mut String,
    filter: &mut String,
    choices: &[Choice],
) {
    let selected_text = choices
        .iter()
        .find(|choice| &choice.id == selected)
        .map_or("(choose)", |choice| choice.label.as_str());

    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(selected_text)
        .width(240.0)
        .show_ui(ui, |ui| {
            ui.add(egui::TextEdit::singleline(filter).hint_text("filter"));
            for choice in rank_choices(choices, filter).into_iter().take(PICKER_ROWS) {
                ui.selectable_value(selected, choice.id.clone(), &choice.label);
            }
        });
}

fn suggested_union_id(dataset: &Dataset, partner_a: &str, partner_b: &str) -> String {
    let base = format!("u-{partner_a}-{partner_b}");
    if !dataset.contains_id(&base) {
        return base;
    }
    (2..)
        .map(|suffix| format!("{base}-{suffix}"))
        .find(|candidate| !dataset.contains_id(candidate))
        .unwrap_or(base)
}

impl ViewModel {
    pub(in crate::app) fn draw_editor(&mut self, ui: &mut Ui) {
        let dataset = self.session.dataset();
        let people = person_choices(dataset);
        let unions = union_choices(dataset);
        let mut action = None;

        ui.heading("Edit");
        ui.add_space(4.0);

        ui.label(RichText::new("Add person").strong());
        let form = &mut self.editor;
        egui::Grid::new("add_person_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Id");
                ui.text_edit_singleline(&mut form.person_id);
                ui.end_row();
                ui.label("Name");
                ui.text_edit_singleline(&mut form.person_name);
                ui.end_row();
                ui.label("Sex");
                ui.horizontal(|ui| {
                    for sex in Sex::ALL {
                        ui.radio_value(&mut form.person_sex, sex, sex.label());
                    }
                });
                ui.end_row();
                ui.label("Notes");
                ui.text_edit_singleline(&mut form.person_notes);
                ui.end_row();
            });
        if ui.button("Add person").clicked() {
            action = Some(EditorAction::AddPerson);
        }

        ui.separator();
        ui.label(RichText::new("Add union").strong());
        ui.horizontal(|ui| {
            ui.label("Partner A");
            picker(ui, "partner_a", &mut form.partner_a, &mut form.partner_a_filter, &people);
        });
        ui.horizontal(|ui| {
            ui.label("Partner B");
            picker(ui, "partner_b", &mut form.partner_b, &mut form.partner_b_filter, &people);
        });
        ui.horizontal(|ui| {
            ui.label("Id");
            ui.add(egui::TextEdit::singleline(&mut form.union_id).hint_text("generated if empty"));
        });
        ui.horizontal(|ui| {
            ui.label("Notes");
            ui.text_edit_singleline(&mut form.union_notes);
        });
        if ui.button("Add union").clicked() {
            action = Some(EditorAction::AddUnion);
        }

        ui.separator();
        ui.label(RichText::new("Link child").strong());
        ui.horizontal(|ui| {
            ui.label("Union");
            picker(ui, "link_union", &mut form.link_union, &mut form.link_union_filter, &unions);
        });
        ui.horizontal(|ui| {
            ui.label("Child");
            picker(ui, "link_child", &mut form.link_child, &mut form.link_child_filter, &people);
        });
        if ui.button("Add child link").clicked() {
            action = Some(EditorAction::AddChildLink);
        }

        ui.separator();
        ui.label(RichText::new("Browse").strong());
        ui.add(egui::TextEdit::singleline(&mut form.browse_filter).hint_text("filter people and unions"));
        let browse_filter = form.browse_filter.clone();

        egui::CollapsingHeader::new(format!("People ({})", people.len()))
            .default_open(true)
            .show(ui, |ui| {
                for choice in rank_choices(&people, &browse_filter).into_iter().take(BROWSE_ROWS) {
                    ui.horizontal(|ui| {
                        if ui.small_button("x").on_hover_text("Remove person").clicked() {
                            action = Some(EditorAction::RemovePerson(choice.id.clone()));
                        }
                        if ui.link(&choice.label).clicked() {
                            action = Some(EditorAction::Select(NodeKey::person(&choice.id)));
                        }
                    });
                }
            });

        egui::CollapsingHeader::new(format!("Unions ({})", unions.len()))
            .default_open(false)
            .show(ui, |ui| {
                for choice in rank_choices(&unions, &browse_filter).into_iter().take(BROWSE_ROWS) {
                    ui.horizontal(|ui| {
                        if ui
                            .small_button("x")
                            .on_hover_text("Remove union and its child links")
                            .clicked()
                        {
                            action = Some(EditorAction::RemoveUnion(choice.id.clone()));
                        }
                        if ui.link(&choice.label).clicked() {
                            action = Some(EditorAction::Select(NodeKey::union(&choice.id)));
                        }
                    });
                }
            });

        if let Some(action) = action {
            self.apply_editor_action(action);
        }
    }

    fn apply_editor_action(&mut self, action: EditorAction) {
        let form = &self.editor;
        let outcome: Result<(String, Option<NodeKey>), EditError> = match action {
            EditorAction::Select(key) => {
                self.session.select(Some(key));
                return;
            }
            EditorAction::AddPerson => {
                let person = Person::new(form.person_id.trim(), form.person_name.trim(), form.person_sex)
                    .with_notes(form.person_notes.trim());
                let key = NodeKey::person(person.id.trim());
                self.session
                    .edit(|dataset| dataset.add_person(person))
                    .map(|()| (format!("Added person `{}`", key.id), Some(key)))
            }
            EditorAction::AddUnion => {
                let id = if form.union_id.trim().is_empty() {
                    suggested_union_id(self.session.dataset(), &form.partner_a, &form.partner_b)
                } else {
                    form.union_id.trim().to_owned()
                };
                let union = Union::new(&id, &form.partner_a, &form.partner_b)
                    .with_notes(form.union_notes.trim());
                self.session
                    .edit(|dataset| dataset.add_union(union))
                    .map(|()| (format!("Added union `{id}`"), Some(NodeKey::union(id))))
            }
            EditorAction::AddChildLink => {
                let link = ChildLink::new(&form.link_union, &form.link_child);
                let message = format!("Linked `{}` under `{}`", link.child_id, link.union_id);
                self.session
                    .edit(|dataset| dataset.add_child_link(link))
                    .map(|()| (message, None))
            }
            EditorAction::RemovePerson(id) => self
                .session
                .edit(|dataset| dataset.remove_person(&id))
                .map(|person| (format!("Removed person `{}`", person.id), None)),
            EditorAction::RemoveUnion(id) => self
                .session
                .edit(|dataset| dataset.remove_union(&id))
                .map(|(union, links)| {
                    (
                        format!("Removed union `{}` and {links} child link(s)", union.id),
                        None,
                    )
                }),
        };

        match outcome {
            Ok((message, created)) => {
                if let Some(key) = created {
                    self.editor.reset_forms();
                    self.session.select(Some(key));
                }
                self.persist_dataset(message);
            }
            Err(error) => self.set_error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str, label: &str) -> Choice {
        Choice {
            id: id.to_owned(),
            label: label.to_owned(),
        }
    }

    #[test]
    fn ranking_filters_and_keeps_order_for_empty_queries() {
        let choices = vec![
            choice("ptolemy-2", "Ptolemy II Philadelphus"),
            choice("arsinoe-2", "Arsinoe II"),
        ];
        let all = rank_choices(&choices, "  ");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "ptolemy-2");

        let hits = rank_choices(&choices, "arsin");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "arsinoe-2");
    }

    #[test]
    fn suggested_union_ids_avoid_taken_ids() {
        let mut dataset = Dataset::default();
        dataset.people.push(Person::new("a", "A", Sex::Male));
        dataset.people.push(Person::new("b", "B", Sex::Female));
        assert_eq!(suggested_union_id(&dataset, "a", "b"), "u-a-b");

        dataset.unions.push(Union::new("u-a-b", "a", "b"));
        assert_eq!(suggested_union_id(&dataset, "a", "b"), "u-a-b-2");
    }
}
