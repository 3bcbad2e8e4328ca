use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::parse::{parse_dataset, validate};
use super::records::Dataset;

/// Supplies the people/relationship dataset a graph is built from.
///
/// Implementations are called from the background build thread.
pub trait GraphSource: Send + Sync {
    fn fetch(&self) -> Result<Dataset>;

    fn describe(&self) -> String;
}

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for JsonFileSource {
    fn fetch(&self) -> Result<Dataset> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read dataset {}", self.path.display()))?;
        parse_dataset(&raw)
            .with_context(|| format!("failed to load dataset {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory dataset, for hosts that already hold their records.
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl GraphSource for StaticSource {
    fn fetch(&self) -> Result<Dataset> {
        validate(&self.dataset)?;
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} people)", self.dataset.people.len())
    }
}
