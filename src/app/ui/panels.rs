use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::physics::EnergyState;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_status_bar(ui));

        egui::SidePanel::left("editor")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("editor_scroll")
                    .show(ui, |ui| self.draw_editor(ui));
            });

        egui::SidePanel::right("inspector")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("inspector_scroll")
                    .show(ui, |ui| {
                        self.draw_settings(ui);
                        ui.separator();
                        self.draw_data(ui);
                        ui.separator();
                        self.draw_details(ui);
                    });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("stemma");
            ui.separator();
            let dataset = self.session.dataset();
            ui.label(format!("people: {}", dataset.people.len()));
            ui.label(format!("unions: {}", dataset.unions.len()));
            ui.label(format!("child links: {}", dataset.child_links.len()));
            let unresolved = self.session.graph().unresolved_edge_count();
            if unresolved > 0 {
                ui.label(
                    RichText::new(format!("dangling: {unresolved}"))
                        .color(Color32::from_rgb(241, 146, 94)),
                )
                .on_hover_text("Edges whose endpoints are missing from the dataset");
            }
            ui.separator();

            let mut search = self.session.search().to_owned();
            let search_box = ui.add(
                egui::TextEdit::singleline(&mut search)
                    .hint_text("Search names")
                    .desired_width(180.0),
            );
            if search_box.changed() {
                self.session.set_search(&search);
            }
            if !self.session.search().trim().is_empty() {
                ui.label(format!("{} match(es)", self.session.scene().search_hits()));
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Reset view").clicked() {
                    self.session.view_mut().reset();
                }
                if ui.button("Fit").clicked() {
                    self.fit_pending = true;
                }
                if ui.button("Unpin all").clicked() {
                    self.session.unpin_all();
                }
                if ui.button("Reheat").clicked() {
                    self.session.reheat();
                }
                let state = self.session.energy_state();
                let color = match state {
                    EnergyState::Running => Color32::from_rgb(246, 206, 104),
                    EnergyState::Cooling => Color32::from_rgb(103, 196, 255),
                    EnergyState::Settled => Color32::from_gray(170),
                };
                ui.label(RichText::new(state.label()).color(color));
                ui.label(format!("zoom {:.0}%", self.session.view().zoom() * 100.0));
            });
        });
    }

    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match &self.status {
            Some(status) if status.is_error => {
                ui.label(RichText::new(&status.text).color(Color32::from_rgb(235, 110, 100)));
            }
            Some(status) => {
                ui.label(&status.text);
            }
            None => {
                ui.label(format!("data: {}", self.storage.root().display()));
            }
        });
    }
}
