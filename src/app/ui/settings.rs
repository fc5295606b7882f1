use eframe::egui::{self, RichText, Ui};

use crate::settings::{
    CHARGE_RANGE, COLLIDE_RADIUS_RANGE, LINK_DISTANCE_RANGE, LayoutSettings,
};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_settings(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);

        let mut settings = *self.session.settings();
        let mut changed = false;

        changed |= ui.checkbox(&mut settings.show_labels, "Show labels").changed();
        changed |= ui.checkbox(&mut settings.show_notes, "Show notes").changed();
        changed |= ui
            .checkbox(&mut settings.lock_on_drag_end, "Keep nodes pinned after dragging")
            .changed();

        ui.add_space(4.0);
        changed |= ui
            .add(egui::Slider::new(&mut settings.link_distance, LINK_DISTANCE_RANGE).text("Link distance"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut settings.charge, CHARGE_RANGE).text("Charge"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.collide_radius, COLLIDE_RADIUS_RANGE)
                    .text("Collide radius"),
            )
            .changed();

        ui.horizontal(|ui| {
            ui.label("Center");
            changed |= ui
                .add(egui::DragValue::new(&mut settings.center[0]).speed(1.0).prefix("x "))
                .changed();
            changed |= ui
                .add(egui::DragValue::new(&mut settings.center[1]).speed(1.0).prefix("y "))
                .changed();
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.live_physics, "Live simulation");
            if ui.button("Defaults").clicked() {
                settings = LayoutSettings::default();
                changed = true;
            }
        });

        let engine = self.session.engine();
        ui.label(
            RichText::new(format!(
                "alpha {:.3}  |  {} pinned  |  {} ticks",
                engine.alpha(),
                engine.pinned_count(),
                engine.ticks()
            ))
            .small(),
        );

        if changed {
            self.session.update_settings(settings);
            self.persist_settings();
        }
    }
}
