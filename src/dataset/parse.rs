use std::collections::HashSet;

use anyhow::{Context, Result};
use thiserror::Error;

use super::records::Dataset;

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset contains no people")]
    Empty,
    #[error("person id `{0}` appears more than once")]
    DuplicatePerson(String),
    #[error("relationship `{id}` has a non-finite confidence")]
    InvalidConfidence { id: String },
}

pub(super) fn parse_dataset(raw: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(raw).context("invalid dataset JSON")?;
    validate(&dataset)?;
    Ok(dataset)
}

pub fn validate(dataset: &Dataset) -> Result<(), DatasetError> {
    if dataset.people.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut seen = HashSet::with_capacity(dataset.people.len());
    for person in &dataset.people {
        if !seen.insert(person.id.as_str()) {
            return Err(DatasetError::DuplicatePerson(person.id.clone()));
        }
    }

    if let Some(bad) = dataset
        .relationships
        .iter()
        .find(|relationship| !relationship.confidence.is_finite())
    {
        return Err(DatasetError::InvalidConfidence { id: bad.id.clone() });
    }

    Ok(())
}
