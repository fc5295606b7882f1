use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context, Vec2};
use log::{error, info, warn};

use crate::family::{Dataset, read_dataset_file, sample_dataset};
use crate::session::Session;
use crate::settings::LayoutSettings;
use crate::storage::Storage;

mod canvas;
mod render_utils;
mod ui;

pub struct StemmaApp {
    storage: Storage,
    import: Option<PathBuf>,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<Result<Loaded, String>> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct Loaded {
    dataset: Dataset,
    settings: LayoutSettings,
    source: String,
}

struct ViewModel {
    session: Session,
    storage: Storage,
    status: Option<StatusLine>,
    live_physics: bool,
    fit_pending: bool,
    canvas_size: Vec2,
    editor: ui::EditorState,
    data_paths: ui::DataPaths,
}

struct StatusLine {
    text: String,
    is_error: bool,
}

impl StemmaApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, storage: Storage, import: Option<PathBuf>) -> Self {
        let state = Self::start_load(storage.clone(), import.clone());
        Self {
            storage,
            import,
            state,
        }
    }

    fn start_load(storage: Storage, import: Option<PathBuf>) -> AppState {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                load_initial(&storage, import.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        AppState::Loading { rx }
    }
}

fn load_initial(storage: &Storage, import: Option<&Path>) -> Result<Loaded> {
    let settings = match storage.load_settings() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(error) => {
            warn!("ignoring stored settings: {error:#}");
            LayoutSettings::default()
        }
    };

    let (dataset, source) = if let Some(path) = import {
        (read_dataset_file(path)?, path.display().to_string())
    } else if let Some(dataset) = storage.load_dataset()? {
        (dataset, storage.dataset_path().display().to_string())
    } else {
        (sample_dataset()?, "bundled sample".to_owned())
    };

    Ok(Loaded {
        dataset,
        settings,
        source,
    })
}

impl eframe::App for StemmaApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(loaded)) => {
                        info!("opened {}", loaded.source);
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            loaded,
                            self.storage.clone(),
                        ))));
                    }
                    Ok(Err(message)) => {
                        error!("load failed: {message}");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading family tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to open the family tree");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Retry").clicked() {
                            transition = Some(Self::start_load(
                                self.storage.clone(),
                                self.import.clone(),
                            ));
                        }
                        if ui.button("Open sample").clicked() {
                            transition = Some(Self::start_load(self.storage.clone(), None));
                            self.import = None;
                        }
                    });
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(loaded: Loaded, storage: Storage) -> Self {
        let data_paths = ui::DataPaths::new(&storage);
        Self {
            session: Session::new(loaded.dataset, loaded.settings),
            storage,
            status: Some(StatusLine {
                text: format!("Opened {}", loaded.source),
                is_error: false,
            }),
            live_physics: true,
            fit_pending: true,
            canvas_size: Vec2::ZERO,
            editor: ui::EditorState::default(),
            data_paths,
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{text}");
        self.status = Some(StatusLine {
            text,
            is_error: true,
        });
    }

    fn persist_dataset(&mut self, success: impl Into<String>) {
        match self.storage.save_dataset(self.session.dataset()) {
            Ok(()) => self.set_status(success),
            Err(error) => self.report_save_failure(format!("Could not save dataset: {error:#}")),
        }
    }

    fn persist_settings(&mut self) {
        if let Err(error) = self.storage.save_settings(self.session.settings()) {
            self.report_save_failure(format!("Could not save settings: {error:#}"));
        }
    }

    fn report_save_failure(&mut self, text: String) {
        error!("{text}");
        self.status = Some(StatusLine {
            text,
            is_error: true,
        });
    }
}
