//! Output tree - relative paths mapped to JSON documents or page sequences.
//!
//! A path ending in `.json` holds one document. Any other path is a
//! directory holding an ordered sequence written as `1.json`, `2.json`, ...

mod flow;

pub use flow::*;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::debug;

use crate::error::{BuildError, Result};

const JSON_SUFFIX: &str = ".json";
const INDENT: &[u8] = b"    ";

/// One entry of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEntry {
    Document(Value),
    Sequence(Vec<Value>),
}

/// Everything a stage writes, keyed by path relative to the output root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTree {
    entries: BTreeMap<String, OutputEntry>,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single document. The path must end in `.json`.
    pub fn insert_document<T: Serialize>(&mut self, path: impl Into<String>, document: &T) -> Result<()> {
        let path = path.into();
        if !path.ends_with(JSON_SUFFIX) {
            return Err(BuildError::InvalidOutputEntry(path));
        }
        self.entries
            .insert(path, OutputEntry::Document(serde_json::to_value(document)?));
        Ok(())
    }

    /// Add an ordered sequence of documents. The path must not end in `.json`.
    pub fn insert_sequence<T: Serialize>(&mut self, path: impl Into<String>, items: &[T]) -> Result<()> {
        let path = path.into();
        if path.is_empty() || path.ends_with(JSON_SUFFIX) {
            return Err(BuildError::InvalidOutputEntry(path));
        }
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.entries.insert(path, OutputEntry::Sequence(values));
        Ok(())
    }

    /// Move every entry of `other` under `prefix`.
    pub fn merge(&mut self, prefix: &str, other: OutputTree) {
        for (path, entry) in other.entries {
            self.entries.insert(format!("{}/{}", prefix, path), entry);
        }
    }

    pub fn get(&self, path: &str) -> Option<&OutputEntry> {
        self.entries.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry under `root`. Returns the number of files written.
    pub fn write(&self, root: &Path) -> Result<usize> {
        let mut written = 0;

        for (path, entry) in &self.entries {
            let target = root.join(path);
            match entry {
                OutputEntry::Document(value) => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
                    }
                    write_json(&target, value)?;
                    written += 1;
                }
                OutputEntry::Sequence(values) => {
                    fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
                    for (index, value) in values.iter().enumerate() {
                        write_json(&target.join(format!("{}{}", index + 1, JSON_SUFFIX)), value)?;
                        written += 1;
                    }
                }
            }
        }

        debug!(root = %root.display(), files = written, "Wrote output tree");
        Ok(written)
    }
}

/// Serialize with four-space indentation, keeping non-ASCII text as is.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let bytes = to_pretty_json(value)?;
    fs::write(path, bytes).map_err(|e| BuildError::io(path, e))
}

/// Remove stage directories under `root` before a rewrite. Missing directories are fine.
pub fn clear(root: &Path, dirs: &[String]) -> Result<()> {
    for dir in dirs {
        let target = root.join(dir);
        match fs::remove_dir_all(&target) {
            Ok(()) => debug!(dir = %target.display(), "Cleared stale output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(BuildError::io(target, e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_validates_paths() {
        let mut tree = OutputTree::new();
        assert!(tree.insert_document("flow/__flow__.json", &json!({"mode": "select"})).is_ok());
        assert!(matches!(
            tree.insert_document("flow/__flow__", &json!({})),
            Err(BuildError::InvalidOutputEntry(_))
        ));
        assert!(matches!(
            tree.insert_sequence("sessions/1.json", &[json!({})]),
            Err(BuildError::InvalidOutputEntry(_))
        ));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let bytes = to_pretty_json(&json!({"text": "caf\u{e9}"})).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\n    \"text\": \"caf\u{e9}\"\n}");
    }

    #[test]
    fn test_write_sequences_and_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = OutputTree::new();
        tree.insert_sequence("treatment/sessions/Finances/1", &[json!({"a": 1}), json!({"b": 2})])
            .unwrap();
        tree.insert_document("treatment/sessions/__flow__.json", &json!({"mode": "select"}))
            .unwrap();

        assert_eq!(tree.write(dir.path()).unwrap(), 3);
        let second = fs::read_to_string(dir.path().join("treatment/sessions/Finances/1/2.json")).unwrap();
        assert_eq!(second, "{\n    \"b\": 2\n}");
        assert!(dir.path().join("treatment/sessions/__flow__.json").is_file());
    }

    #[test]
    fn test_merge_prefixes_paths() {
        let mut inner = OutputTree::new();
        inner.insert_sequence("end of day", &[json!({})]).unwrap();
        let mut outer = OutputTree::new();
        outer.merge("HD/treatment", inner);
        assert_eq!(outer.paths().collect::<Vec<_>>(), vec!["HD/treatment/end of day"]);
    }

    #[test]
    fn test_clear_ignores_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("HD/treatment/sessions/old")).unwrap();

        clear(
            dir.path(),
            &["HD/treatment/sessions".to_string(), "HD/control/sessions".to_string()],
        )
        .unwrap();
        assert!(!dir.path().join("HD/treatment/sessions").exists());
        assert!(dir.path().join("HD/treatment").exists());
    }
}
