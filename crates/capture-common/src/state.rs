//! Key-value state file.
//!
//! A single JSON object on disk, read on every access. Writers that need a
//! read-modify-write cycle take [`KvFile::lock`] first; the lock is an
//! exclusive advisory lock on a sidecar `.lock` file.

use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while reading or writing the state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state file {path} does not hold a JSON object")]
    NotAnObject { path: Utf8PathBuf },

    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode value for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON key-value document on disk.
#[derive(Debug, Clone)]
pub struct KvFile {
    /// Path to the JSON document
    path: Utf8PathBuf,
}

/// Exclusive writer lock; released on drop.
#[derive(Debug)]
pub struct KvLock {
    file: File,
}

impl Drop for KvLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl KvFile {
    /// Create a handle for the document at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn lock_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.lock", self.path))
    }

    fn io_error(&self, source: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        Ok(())
    }

    /// Block until the exclusive writer lock is held.
    pub fn lock(&self) -> Result<KvLock, StateError> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;
        file.lock_exclusive().map_err(|e| self.io_error(e))?;
        Ok(KvLock { file })
    }

    /// Load the whole document. A missing or blank file is an empty object.
    fn load_document(&self) -> Result<Map<String, Value>, StateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&content).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(StateError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    /// Replace the document on disk. Writes go through a temp file and a rename.
    fn save_document(&self, document: &Map<String, Value>) -> Result<(), StateError> {
        self.ensure_dir()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };

        let content =
            serde_json::to_string_pretty(document).map_err(|source| StateError::Encode {
                key: self.path.to_string(),
                source,
            })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    /// Read the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateError> {
        let mut document = self.load_document()?;
        match document.remove(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StateError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Store `value` under `key`, keeping every other key intact.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StateError> {
        let encoded = serde_json::to_value(value).map_err(|source| StateError::Encode {
            key: key.to_string(),
            source,
        })?;
        let mut document = self.load_document()?;
        document.insert(key.to_string(), encoded);
        self.save_document(&document)
    }

    /// Check if the document exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
