//! Key-value backends for learner preferences.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;

use crate::error::StorageError;

/// A string key-value store. Writes come in batches so a backend can apply
/// them all at once.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    fn erase(self) -> Box<dyn Storage>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryStorage {
    entries: BTreeMap<String, String>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

/// A JSON object on disk, rewritten through a temporary file and a rename on
/// every batch.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// A missing file starts empty. An unreadable document is logged and
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Value>>(&bytes) {
                Ok(document) => string_entries(document, &path),
                Err(err) => {
                    warn!(
                        "Ignoring corrupted preferences file {}: {}",
                        path.display(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No preferences file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Keeps string values. Any other JSON value only loses its own key.
fn string_entries(document: BTreeMap<String, Value>, path: &Path) -> BTreeMap<String, String> {
    document
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            other => {
                warn!(
                    "Ignoring non-string value for {} in {}: {}",
                    key,
                    path.display(),
                    other
                );
                None
            }
        })
        .collect()
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut updated = self.entries.clone();
        for (key, value) in entries {
            updated.insert((*key).to_string(), value.clone());
        }
        // only adopt the batch once it is on disk
        self.flush(&updated)?;
        self.entries = updated;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip() {
        let mut storage = InMemoryStorage::new();
        assert_eq!(storage.get("skillLevel").unwrap(), None);

        storage
            .set_all(&[("skillLevel", "Advanced".to_string())])
            .unwrap();
        assert_eq!(storage.get("skillLevel").unwrap().as_deref(), Some("Advanced"));
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage
            .set_all(&[
                ("skillLevel", "Intermediate".to_string()),
                ("completedTopics", "[\"swift-basics\"]".to_string()),
            ])
            .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("skillLevel").unwrap().as_deref(), Some("Intermediate"));
        assert_eq!(
            reopened.get("completedTopics").unwrap().as_deref(),
            Some("[\"swift-basics\"]")
        );
        assert_eq!(reopened.get("bookmarkedTopics").unwrap(), None);
    }

    #[test]
    fn non_string_value_only_drops_its_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(
            &path,
            r#"{"skillLevel": 3, "hasCompletedOnboarding": null, "completedTopics": "[\"swift-basics\"]"}"#,
        )
        .unwrap();

        let storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.get("skillLevel").unwrap(), None);
        assert_eq!(storage.get("hasCompletedOnboarding").unwrap(), None);
        assert_eq!(
            storage.get("completedTopics").unwrap().as_deref(),
            Some("[\"swift-basics\"]")
        );
    }

    #[test]
    fn failed_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage
            .set_all(&[("skillLevel", "Advanced".to_string())])
            .unwrap();
        let before = fs::read(&path).unwrap();

        // a directory where the temporary file should go makes the write fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(storage
            .set_all(&[("skillLevel", "Beginner".to_string())])
            .is_err());

        assert_eq!(storage.get("skillLevel").unwrap().as_deref(), Some("Advanced"));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn corrupted_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, b"{ not json").unwrap();

        let mut storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.get("skillLevel").unwrap(), None);

        storage
            .set_all(&[("skillLevel", "Beginner".to_string())])
            .unwrap();
        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("skillLevel").unwrap().as_deref(), Some("Beginner"));
    }
}
