//! Record and candidate file types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// An input file discovered by the scanner
///
/// `depth` counts the directories between the scan root and the file, so a file
/// placed directly in the root has depth 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateFile {
    path: PathBuf,
    depth: usize,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            path: path.into(),
            depth,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Ordered field name to value mapping produced once per input file
///
/// Keys are kept exactly as the source produced them. Values are scalars,
/// arrays of scalars, or JSON-encoded strings for nested structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Field names in source order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Renders a field as a CSV cell
    ///
    /// Strings are written raw, null and missing fields as an empty cell, and
    /// everything else in its JSON form.
    pub fn cell(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for FlatRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_record_preserves_insertion_order() {
        let mut record = FlatRecord::new();
        record.insert("zeta", json!(1));
        record.insert("alpha", json!(2));
        record.insert("Mid Key", json!(3));

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "Mid Key"]);
    }

    #[test]
    fn test_flat_record_cells() {
        let record: FlatRecord = [
            ("name".to_string(), json!("Doe^John")),
            ("rows".to_string(), json!(512)),
            ("spacing".to_string(), json!([0.5, 0.5])),
            ("missing".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.cell("name"), "Doe^John");
        assert_eq!(record.cell("rows"), "512");
        assert_eq!(record.cell("spacing"), "[0.5,0.5]");
        assert_eq!(record.cell("missing"), "");
        assert_eq!(record.cell("absent"), "");
    }

    #[test]
    fn test_flat_record_serializes_as_object() {
        let mut record = FlatRecord::new();
        record.insert("a", json!(1));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":1}"#);
    }

    #[test]
    fn test_candidate_file_accessors() {
        let file = CandidateFile::new("/data/a.json", 2);
        assert_eq!(file.path(), Path::new("/data/a.json"));
        assert_eq!(file.depth(), 2);
    }
}
