//! Preference backends

use crate::error::{TallyError, TallyResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Backing store for string preferences.
///
/// Writes must be durable and visible to the next `get` before `set` returns.
pub trait PreferenceBackend: Send + Sync {
    /// Read a value
    fn get(&self, name: &str) -> TallyResult<Option<String>>;

    /// Write a value
    fn set(&self, name: &str, value: &str) -> TallyResult<()>;
}

/// JSON file backend (`<data_dir>/preferences.json`).
///
/// Every read goes to the file, so separate handles over the same path stay
/// consistent with each other.
#[derive(Debug)]
pub struct FilePreferenceBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceBackend {
    /// Preference file name inside the data directory
    pub const FILE_NAME: &'static str = "preferences.json";

    /// Create a backend for the file inside `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join(Self::FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the preference file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TallyResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        Ok(Some(content).filter(|c| !c.trim().is_empty()))
    }

    fn load(&self) -> TallyResult<BTreeMap<String, String>> {
        match self.read()? {
            Some(content) => serde_json::from_str(&content).map_err(|e| self.error(e)),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Current values as the base of a write; an unparsable file starts over empty
    fn load_for_write(&self) -> TallyResult<BTreeMap<String, String>> {
        let Some(content) = self.read()? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "replacing unreadable preference file");
            BTreeMap::new()
        }))
    }

    fn error(&self, message: impl std::fmt::Display) -> TallyError {
        TallyError::storage_with_path(message.to_string(), self.path.display().to_string())
    }
}

impl PreferenceBackend for FilePreferenceBackend {
    fn get(&self, name: &str) -> TallyResult<Option<String>> {
        Ok(self.load()?.remove(name))
    }

    fn set(&self, name: &str, value: &str) -> TallyResult<()> {
        let _guard = self.write_lock.lock();
        let mut values = self.load_for_write()?;
        values.insert(name.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        // Write then rename so a reader never sees a half-written file
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&values)?;
        std::fs::write(&tmp, content).map_err(|e| self.error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.error(e))?;
        Ok(())
    }
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryPreferenceBackend {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryPreferenceBackend {
    fn get(&self, name: &str) -> TallyResult<Option<String>> {
        Ok(self.values.lock().get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> TallyResult<()> {
        self.values
            .lock()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
