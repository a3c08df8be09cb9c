//! Durable key-value slots, used to persist the task list across sessions

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A persistent key-value store, where every value is a text document
pub trait Storage {
    /// Returns the document stored under `key`, or `None` if this slot has never been written
    fn read(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Replace the whole document stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
}


/// A storage that keeps every slot in its own file of a given folder
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    backing_folder: PathBuf,
}

impl FileStorage {
    /// Create a storage in `folder`. Nothing is created on disk until the first write
    pub fn new(folder: &Path) -> Self {
        Self { backing_folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// Get the path to the file that backs a given slot
    pub fn slot_file(&self, key: &str) -> PathBuf {
        self.backing_folder.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.slot_file(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to open file {:?}: {}", path, err).into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        std::fs::create_dir_all(&self.backing_folder)?;
        let path = self.slot_file(key);
        std::fs::write(&path, value)
            .map_err(|err| format!("Unable to save file {:?}: {}", path, err))?;
        Ok(())
    }
}


/// A storage that lives in memory only.
///
/// Clones share the same slots, so that a test can keep a handle and check what has been written.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with a pre-filled slot
    pub fn with_slot(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let slots = self.slots.lock().map_err(|_| "memory storage lock is poisoned")?;
        Ok(slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let mut slots = self.slots.lock().map_err(|_| "memory storage lock is poisoned")?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
