//! Durable preference storage.
//!
//! A small string key/value store, the same shape as browser local storage.
//! The coordinator keeps the selected language under `selectedLanguage` as a
//! JSON-serialized `LanguageDescriptor`.

use crate::i18n::LanguageDescriptor;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

/// Storage key of the persisted language preference
pub const SELECTED_LANGUAGE_KEY: &str = "selectedLanguage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access preference storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preference data: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait PreferenceStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read the persisted language preference.
///
/// Returns `Ok(None)` when nothing has been saved yet. The descriptor is not
/// checked against the catalog here.
pub fn read_language(
    store: &dyn PreferenceStore,
) -> Result<Option<LanguageDescriptor>, StorageError> {
    match store.load(SELECTED_LANGUAGE_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_language(
    store: &dyn PreferenceStore,
    language: &LanguageDescriptor,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(language)?;
    store.save(SELECTED_LANGUAGE_KEY, &raw)
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file (`{ "key": "value", ... }`).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StorageError::Serialization(e)) => {
                warn!(
                    "Preference file {} is corrupt, rewriting it: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Readers must never observe a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(&values)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
