use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::model::Dataset;

const REQUIRED_KEYS: [&str; 3] = ["people", "unions", "childLinks"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("expected a JSON object at the top level")]
    NotAnObject,
    #[error("missing top-level key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid `{key}` collection: {source}")]
    InvalidCollection {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub fn import_dataset(raw: &str) -> Result<Dataset, ImportError> {
    let parsed: Value = serde_json::from_str(raw).map_err(ImportError::Malformed)?;
    let object = parsed.as_object().ok_or(ImportError::NotAnObject)?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(ImportError::MissingKey(key));
        }
    }

    let collection = |key: &'static str| -> Result<Value, ImportError> {
        let value = object.get(key).cloned().unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(value)
    };

    let people = Vec::deserialize(collection("people")?)
        .map_err(|source| ImportError::InvalidCollection { key: "people", source })?;
    let unions = Vec::deserialize(collection("unions")?)
        .map_err(|source| ImportError::InvalidCollection { key: "unions", source })?;
    let child_links = Vec::deserialize(collection("childLinks")?).map_err(|source| {
        ImportError::InvalidCollection {
            key: "childLinks",
            source,
        }
    })?;

    Ok(Dataset {
        people,
        unions,
        child_links,
    })
}

pub fn export_dataset(dataset: &Dataset) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dataset)
}

pub fn read_dataset_file(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    let dataset =
        import_dataset(&raw).with_context(|| format!("failed to import `{}`", path.display()))?;
    info!(
        "imported {} people, {} unions, {} child links from {}",
        dataset.people.len(),
        dataset.unions.len(),
        dataset.child_links.len(),
        path.display()
    );
    Ok(dataset)
}

pub fn write_dataset_file(path: &Path, dataset: &Dataset) -> Result<()> {
    let raw = export_dataset(dataset).context("failed to serialize dataset")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("failed to write `{}`", path.display()))?;
    Ok(())
}
