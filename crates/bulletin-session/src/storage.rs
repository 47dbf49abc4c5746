//! Durable storage backends for the session record.
//!
//! The store writes one serialized record under one key. Backends only
//! move bytes; they know nothing about what a session is.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::SessionError;

/// Key-value storage for serialized session records.
///
/// Calls are synchronous: the store holds its lock across a write so that
/// two mutations never interleave on disk.
pub trait SessionStorage: Send + Sync + 'static {
    /// Returns the bytes stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SessionError>;

    /// Replaces whatever is stored under `key`.
    fn save(&self, key: &str, data: &[u8]) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process storage. Clones share the same map, so a test can keep one
/// clone to inspect what the store wrote, or reopen a store over it to
/// simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the bytes under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SessionError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<(), SessionError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is renamed over the target, so a crash mid-write leaves the
/// previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SessionError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(e)),
        }
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(SessionError::Storage)?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, data).map_err(SessionError::Storage)?;
        fs::rename(&tmp, &target).map_err(SessionError::Storage)
    }
}
