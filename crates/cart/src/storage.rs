//! Durable string-keyed persistence.
//!
//! The cart survives process restarts through a minimal key-value
//! contract: `get` and `set` over string keys and string values. The
//! default implementation keeps a single JSON object in a file and
//! writes through a temp-file rename so a crash mid-write never leaves
//! a torn value behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in the durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized or the backing file is malformed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A durable string-keyed store surviving process restarts.
///
/// The store is generic over this trait so tests can inject in-memory
/// fakes.
pub trait Storage {
    /// Read the value for a key, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the value for a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed [`Storage`]: one JSON object of `key -> value` per file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a store backed by the given file path.
    ///
    /// The file and its parent directories are created lazily on the
    /// first write; a missing file reads as empty.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<serde_json::Map<String, serde_json::Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(serde_json::Map::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(
        &self,
        entries: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file, then rename over the target so
        // readers never observe a partially written store.
        let tmp = temp_path(&self.path);
        let mut file = fs::File::create(&tmp)?;
        file.write_all(serde_json::to_string(entries)?.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(
            key.to_string(),
            serde_json::Value::String(value.to_string()),
        );
        self.write_entries(&entries)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| "storage".into(), std::ffi::OsStr::to_os_string);
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("cart.json"));
        assert!(storage.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("cart.json"));

        storage.set("cart", r#"[{"id":1,"amount":2}]"#).unwrap();
        assert_eq!(
            storage.get("cart").unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":2}]"#)
        );
        assert!(storage.get("other").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("cart.json"));

        storage.set("cart", "[]").unwrap();
        storage.set("cart", r#"[{"id":3,"amount":1}]"#).unwrap();
        assert_eq!(
            storage.get("cart").unwrap().as_deref(),
            Some(r#"[{"id":3,"amount":1}]"#)
        );
    }

    #[test]
    fn test_value_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        FileStorage::new(&path).set("cart", "[]").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/deep/cart.json"));
        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get("cart"),
            Err(StorageError::Serialize(_))
        ));
    }
}
