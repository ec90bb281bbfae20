//! Durable client storage.
//!
//! A small key-value abstraction holding JSON records that survive process
//! restarts. Stores read their record once when constructed and rewrite it
//! on every mutation; storage is a mirror of in-memory state, never the
//! source of truth.
//!
//! Two backends are provided:
//! - [`FileStorage`] - one `<key>.json` file per record in a data directory
//! - [`MemoryStorage`] - process-local map, used by tests and ephemeral runs

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Record holding the authenticated user and access token.
pub const AUTH_RECORD: &str = "auth-storage";

/// Record holding the cart line items.
pub const CART_RECORD: &str = "cart-storage";

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for record '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Record could not be encoded or decoded.
    #[error("storage record '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record name contains characters that are not allowed in a key.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Persistent key-value storage for named JSON records.
pub trait DurableStorage: Send + Sync {
    /// Read a record. Returns `Ok(None)` if it was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON record.
///
/// # Errors
///
/// Returns an error if the record cannot be read or is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn DurableStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .load(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

/// Encode and write a JSON record.
///
/// # Errors
///
/// Returns an error if encoding fails or the record cannot be written.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn DurableStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &raw)
}

/// Only lowercase alphanumerics, `-` and `_` may appear in a record key.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores each record as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// record, so a crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DurableStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::trace!(key, path = %path.display(), "Record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage; records last as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record is currently present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.lock().contains_key(key)
    }
}

impl DurableStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.records.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.records
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.records.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.load(CART_RECORD).unwrap(), None);

        storage.save(CART_RECORD, r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.load(CART_RECORD).unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert!(dir.path().join("nested/cart-storage.json").exists());
        assert!(!dir.path().join("nested/cart-storage.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path())
            .save(AUTH_RECORD, "{}")
            .unwrap();

        let reopened = FileStorage::new(dir.path());
        assert_eq!(reopened.load(AUTH_RECORD).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.save(AUTH_RECORD, "{}").unwrap();
        storage.remove(AUTH_RECORD).unwrap();
        storage.remove(AUTH_RECORD).unwrap();
        assert_eq!(storage.load(AUTH_RECORD).unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.save("../etc/passwd", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.load(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_json_helpers() {
        let storage = MemoryStorage::new();
        save_json(&storage, CART_RECORD, &vec![1, 2, 3]).unwrap();

        let loaded: Option<Vec<i32>> = load_json(&storage, CART_RECORD).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        storage.save(CART_RECORD, "not json").unwrap();
        let result: Result<Option<Vec<i32>>, _> = load_json(&storage, CART_RECORD);
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }
}
