use std::{
    collections::HashMap,
    io::ErrorKind,
    ops::Deref,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use tracing::warn;

/// Interface for abstracting the key-value medium the stores persist into.
/// Reads of missing or unreadable data resolve to absence and writes are
/// best-effort, so callers never have to handle storage failures.
pub trait StorageMedium {
    /// Returns the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Replaces the payload under `key` wholesale.
    fn set(&self, key: &str, value: &str);

    /// Deletes the payload under `key`. Idempotent.
    fn remove(&self, key: &str);
}

impl<T: Deref> StorageMedium for T
where
    T::Target: StorageMedium,
{
    fn get(&self, key: &str) -> Option<String> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.deref().set(key, value)
    }

    fn remove(&self, key: &str) {
        self.deref().remove(key)
    }
}

/// The main realization of [StorageMedium]. Every logical key lives in its
/// own `<key>.json` file under the medium directory.
#[derive(Debug, Clone)]
pub struct JsonFileMedium {
    dir: PathBuf,
}

impl JsonFileMedium {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageMedium for JsonFileMedium {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(v) => Some(v),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {path:?}: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Failed to create medium directory {:?}: {e}", self.dir);
            return;
        }
        let path = self.key_path(key);
        if let Err(e) = std::fs::write(&path, value) {
            warn!("Failed to write {path:?}: {e}");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {path:?}: {e}"),
        }
    }
}

/// In-memory medium. Stands in when no durable medium is wanted and backs the
/// store tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryMedium {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("Medium lock should never be poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("Medium lock should never be poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .expect("Medium lock should never be poisoned")
            .remove(key);
    }
}
