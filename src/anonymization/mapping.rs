//! Pseudonym mapping and its on-disk form

use crate::domain::{Result, ScrublineError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Original value to pseudonym token
///
/// Keys are always original values. Merging is a union where an existing
/// entry is never replaced, which makes it commutative, associative and
/// idempotent for fragments produced under one salt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PseudonymMapping(BTreeMap<String, String>);

impl PseudonymMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pseudonym for `original` unless one is already present
    pub fn record(&mut self, original: impl Into<String>, token: impl Into<String>) {
        self.0.entry(original.into()).or_insert_with(|| token.into());
    }

    /// Union-merges `fragment` into this mapping
    pub fn merge(&mut self, fragment: &PseudonymMapping) {
        for (original, token) in &fragment.0 {
            self.0
                .entry(original.clone())
                .or_insert_with(|| token.clone());
        }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.0.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// The mapping file written at the end of a batch
///
/// `{"mapping": {...}, "salt": "..."}`; `salt` is present only when the run
/// generated its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub mapping: PseudonymMapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl MappingDocument {
    pub fn new(mapping: PseudonymMapping, salt: Option<String>) -> Self {
        Self { mapping, salt }
    }

    /// Writes the document as pretty-printed JSON, creating parent directories
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScrublineError::Io(format!(
                    "Failed to create mapping directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            ScrublineError::Io(format!(
                "Failed to write mapping file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            entries = self.mapping.len(),
            salt_saved = self.salt.is_some(),
            "Saved anonymization mapping"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
