//! Keyed document storage.
//!
//! Every dataset is one JSON object shaped `{owner_id: {key: record}}`.
//! Callers read and replace either one owner's document or, with no owner,
//! the whole dataset. The metrics engine never touches this module; history
//! loaders sit between the two.

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A JSON object document
pub type Document = Map<String, Value>;

/// The logical datasets Stride persists
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    Checkins,
    ActivityImports,
    Growth,
    Competitions,
    Goals,
    Wearables,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Checkins => "checkins",
            Dataset::ActivityImports => "activity_imports",
            Dataset::Growth => "growth",
            Dataset::Competitions => "competitions",
            Dataset::Goals => "goals",
            Dataset::Wearables => "wearables",
        }
    }
}

/// Storage seam between history loading and the persistence technology
pub trait DocumentStore {
    /// Read one owner's document, or the whole dataset when `owner` is None.
    /// Missing datasets and owners read as an empty document.
    fn get(&self, dataset: Dataset, owner: Option<&str>) -> Result<Document>;

    /// Replace one owner's document, or the whole dataset when `owner` is None
    fn put(&mut self, dataset: Dataset, owner: Option<&str>, document: Document) -> Result<()>;
}

fn check_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(Error::Store("owner id must not be empty".into()));
    }
    Ok(())
}

/// Pick `owner`'s sub-document out of a full dataset
fn owner_document(mut full: Document, dataset: Dataset, owner: Option<&str>) -> Result<Document> {
    let Some(owner) = owner else {
        return Ok(full);
    };
    check_owner(owner)?;

    match full.remove(owner) {
        Some(Value::Object(doc)) => Ok(doc),
        Some(other) => {
            tracing::warn!(
                "Entry for {} in {} is not an object ({}), treating as empty",
                owner,
                dataset.name(),
                other
            );
            Ok(Document::new())
        }
        None => Ok(Document::new()),
    }
}

/// Write `document` into `full` under `owner` (or replace `full` entirely)
fn merge_owner(full: &mut Document, owner: Option<&str>, document: Document) -> Result<()> {
    match owner {
        Some(owner) => {
            check_owner(owner)?;
            full.insert(owner.to_string(), Value::Object(document));
        }
        None => *full = document,
    }
    Ok(())
}

// ============================================================================
// File-backed store
// ============================================================================

/// One `<root>/<dataset>.json` file per dataset
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.root.join(format!("{}.json", dataset.name()))
    }

    /// Load a dataset file with shared locking
    ///
    /// Returns an empty document if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns an
    /// empty document.
    fn load(path: &Path) -> Result<Document> {
        if !path.exists() {
            tracing::debug!("No dataset file at {:?}, starting empty", path);
            return Ok(Document::new());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open dataset {:?}: {}. Using empty.", path, e);
                return Ok(Document::new());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock dataset {:?}: {}. Using empty.", path, e);
            return Ok(Document::new());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read dataset {:?}: {}. Using empty.", path, e);
            return Ok(Document::new());
        }

        file.unlock()?;

        match serde_json::from_str::<Document>(&contents) {
            Ok(doc) => {
                tracing::debug!("Loaded {} entries from {:?}", doc.len(), path);
                Ok(doc)
            }
            Err(e) => {
                tracing::warn!("Failed to parse dataset {:?}: {}. Using empty.", path, e);
                Ok(Document::new())
            }
        }
    }

    /// Save a dataset file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(path: &Path, document: &Document) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Store(format!("dataset path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} entries to {:?}", document.len(), path);
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn get(&self, dataset: Dataset, owner: Option<&str>) -> Result<Document> {
        let full = Self::load(&self.path_for(dataset))?;
        owner_document(full, dataset, owner)
    }

    fn put(&mut self, dataset: Dataset, owner: Option<&str>, document: Document) -> Result<()> {
        let path = self.path_for(dataset);
        let mut full = match owner {
            Some(_) => Self::load(&path)?,
            None => Document::new(),
        };
        merge_owner(&mut full, owner, document)?;
        Self::save(&path, &full)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store that keeps everything in memory (tests and dry runs)
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    datasets: HashMap<Dataset, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, dataset: Dataset, owner: Option<&str>) -> Result<Document> {
        let full = self.datasets.get(&dataset).cloned().unwrap_or_default();
        owner_document(full, dataset, owner)
    }

    fn put(&mut self, dataset: Dataset, owner: Option<&str>, document: Document) -> Result<()> {
        let full = self.datasets.entry(dataset).or_default();
        merge_owner(full, owner, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let entry = doc(json!({ "2024-03-01": { "sleep_hours": 8.5, "mood": 4 } }));
        store.put(Dataset::Checkins, Some("ava"), entry.clone()).unwrap();

        assert_eq!(store.get(Dataset::Checkins, Some("ava")).unwrap(), entry);
        assert!(store.path_for(Dataset::Checkins).ends_with("checkins.json"));
    }

    #[test]
    fn test_owners_are_isolated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        store
            .put(Dataset::Growth, Some("ava"), doc(json!({ "2024-01-01": { "height": 150.0 } })))
            .unwrap();
        store
            .put(Dataset::Growth, Some("leo"), doc(json!({ "2024-01-01": { "height": 140.0 } })))
            .unwrap();

        let full = store.get(Dataset::Growth, None).unwrap();
        assert_eq!(full.len(), 2);
        assert_eq!(
            store.get(Dataset::Growth, Some("leo")).unwrap()["2024-01-01"]["height"],
            json!(140.0)
        );
        assert!(store.get(Dataset::Growth, Some("mia")).unwrap().is_empty());
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("not-yet"));
        assert!(store.get(Dataset::ActivityImports, Some("ava")).unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_dataset_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        std::fs::write(store.path_for(Dataset::Checkins), "{ invalid json }").unwrap();

        let result = store.get(Dataset::Checkins, Some("ava"));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_non_object_owner_entry_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        std::fs::write(store.path_for(Dataset::Checkins), r#"{ "ava": [1, 2, 3] }"#).unwrap();

        assert!(store.get(Dataset::Checkins, Some("ava")).unwrap().is_empty());
    }

    #[test]
    fn test_empty_owner_rejected() {
        let mut store = MemoryStore::new();
        let result = store.put(Dataset::Checkins, Some("  "), Document::new());
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());
        store.put(Dataset::Competitions, None, Document::new()).unwrap();

        // Only the dataset file remains, no stray temp files
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "competitions.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only competitions.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_memory_store_matches_file_semantics() {
        let mut store = MemoryStore::new();
        store
            .put(Dataset::Checkins, Some("ava"), doc(json!({ "2024-03-01": { "mood": 3 } })))
            .unwrap();
        store
            .put(Dataset::Checkins, Some("ava"), doc(json!({ "2024-03-02": { "mood": 4 } })))
            .unwrap();

        let ava = store.get(Dataset::Checkins, Some("ava")).unwrap();
        assert_eq!(ava.len(), 1);
        assert!(ava.contains_key("2024-03-02"));

        store.put(Dataset::Checkins, None, Document::new()).unwrap();
        assert!(store.get(Dataset::Checkins, Some("ava")).unwrap().is_empty());
    }
}
