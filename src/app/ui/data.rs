use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use eframe::egui::{self, Ui};

use crate::family::{Dataset, read_dataset_file, sample_dataset, write_dataset_file};
use crate::storage::Storage;

use super::super::ViewModel;

pub(in crate::app) struct DataPaths {
    import: String,
    export_json: String,
    export_svg: String,
}

impl DataPaths {
    pub(in crate::app) fn new(storage: &Storage) -> Self {
        let path_in = |name: &str| storage.root().join(name).display().to_string();
        Self {
            import: String::new(),
            export_json: path_in("export.json"),
            export_svg: path_in("export.svg"),
        }
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| PathBuf::from(raw))
}

impl ViewModel {
    pub(in crate::app) fn draw_data(&mut self, ui: &mut Ui) {
        ui.heading("Data");
        ui.add_space(4.0);

        ui.label("Import JSON");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.data_paths.import)
                    .hint_text("/path/to/tree.json")
                    .desired_width(200.0),
            );
            if ui.button("Import").clicked() {
                self.import_from_path();
            }
        });

        ui.label("Export JSON");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.data_paths.export_json).desired_width(200.0));
            if ui.button("Export").clicked() {
                self.export_json();
            }
        });

        ui.label("Export SVG (current view)");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.data_paths.export_svg).desired_width(200.0));
            if ui.button("Export").clicked() {
                self.export_svg();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Load sample").clicked() {
                match sample_dataset() {
                    Ok(dataset) => self.replace_dataset(dataset, "bundled sample"),
                    Err(error) => self.set_error(format!("Sample is unreadable: {error}")),
                }
            }
            if ui.button("New empty").clicked() {
                self.replace_dataset(Dataset::default(), "empty dataset");
            }
        });
    }

    fn replace_dataset(&mut self, dataset: Dataset, source: &str) {
        self.session.replace_dataset(dataset);
        self.editor.reset_forms();
        self.fit_pending = true;
        self.persist_dataset(format!("Opened {source}"));
    }

    fn import_from_path(&mut self) {
        let Some(path) = non_empty_path(&self.data_paths.import) else {
            self.set_error("Enter a path to import");
            return;
        };
        match read_dataset_file(&path) {
            Ok(dataset) => self.replace_dataset(dataset, &path.display().to_string()),
            Err(error) => self.set_error(format!("Import failed: {error:#}")),
        }
    }

    fn export_json(&mut self) {
        let Some(path) = non_empty_path(&self.data_paths.export_json) else {
            self.set_error("Enter a path to export to");
            return;
        };
        match write_dataset_file(&path, self.session.dataset()) {
            Ok(()) => self.set_status(format!("Wrote {}", path.display())),
            Err(error) => self.set_error(format!("Export failed: {error:#}")),
        }
    }

    fn export_svg(&mut self) {
        let Some(path) = non_empty_path(&self.data_paths.export_svg) else {
            self.set_error("Enter a path to export to");
            return;
        };
        let svg = self.session.export_svg(self.canvas_size);
        let written = fs::write(&path, svg)
            .with_context(|| format!("failed to write `{}`", path.display()));
        match written {
            Ok(()) => self.set_status(format!("Wrote {}", path.display())),
            Err(error) => self.set_error(format!("SVG export failed: {error:#}")),
        }
    }
}
