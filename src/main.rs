use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui::vec2;
use log::info;

use stemma::app::StemmaApp;
use stemma::family::read_dataset_file;
use stemma::logging::init_logging;
use stemma::storage::Storage;
use stemma::Session;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding dataset.json and settings.json.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Open this JSON document instead of the stored dataset.
    #[arg(long)]
    import: Option<PathBuf>,

    /// Lay the graph out without a window and write it as SVG to this path.
    #[arg(long)]
    export_svg: Option<PathBuf>,

    /// Simulation steps to run before a headless export.
    #[arg(long, default_value_t = 300)]
    ticks: u32,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Log filter, e.g. `info` or `stemma=debug`. `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = init_logging(&args.log_level)?;

    let storage = match &args.data_dir {
        Some(dir) => Storage::new(dir),
        None => Storage::new(Storage::default_dir()?),
    };
    info!("data directory: {}", storage.root().display());

    if let Some(output) = &args.export_svg {
        return export_headless(&args, &storage, output);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };
    let import = args.import.clone();

    eframe::run_native(
        "stemma",
        options,
        Box::new(move |cc| Ok(Box::new(StemmaApp::new(cc, storage, import)))),
    )
    .map_err(|error| anyhow!("window error: {error}"))
}

fn export_headless(args: &Args, storage: &Storage, output: &Path) -> Result<()> {
    let dataset = match &args.import {
        Some(path) => read_dataset_file(path)?,
        None => storage
            .load_dataset()?
            .context("no stored dataset; pass --import <file>")?,
    };
    let settings = storage.load_settings()?.unwrap_or_default();

    let mut session = Session::new(dataset, settings);
    for _ in 0..args.ticks {
        if !session.tick() {
            break;
        }
    }
    session.refresh_scene();

    let viewport = vec2(args.width.max(1.0), args.height.max(1.0));
    session.fit_view(viewport);
    let svg = session.export_svg(viewport);
    fs::write(output, svg).with_context(|| format!("failed to write `{}`", output.display()))?;
    info!(
        "wrote {} after {} ticks ({})",
        output.display(),
        session.engine().ticks(),
        session.energy_state().label()
    );
    Ok(())
}
