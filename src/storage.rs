use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};

use crate::family::{Dataset, read_dataset_file, write_dataset_file};
use crate::settings::LayoutSettings;

const APP_DIR: &str = "stemma";
const DATASET_FILE: &str = "dataset.json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
            .map(|base| base.join(APP_DIR))
            .ok_or_else(|| anyhow!("no data directory available for this user"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.root.join(DATASET_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn load_dataset(&self) -> Result<Option<Dataset>> {
        let path = self.dataset_path();
        if !path.exists() {
            debug!("no stored dataset at {}", path.display());
            return Ok(None);
        }
        read_dataset_file(&path).map(Some)
    }

    pub fn save_dataset(&self, dataset: &Dataset) -> Result<()> {
        let path = self.dataset_path();
        write_dataset_file(&path, dataset)?;
        debug!("dataset saved to {}", path.display());
        Ok(())
    }

    pub fn load_settings(&self) -> Result<Option<LayoutSettings>> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let settings: LayoutSettings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!("loaded layout settings from {}", path.display());
        Ok(Some(settings.sanitized()))
    }

    pub fn save_settings(&self, settings: &LayoutSettings) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create `{}`", self.root.display()))?;
        let path = self.settings_path();
        let raw =
            serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&path, raw).with_context(|| format!("failed to write `{}`", path.display()))?;
        debug!("settings saved to {}", path.display());
        Ok(())
    }
}
