//! Key-value persistence for application state.
//!
//! The store is opaque: it saves and loads strings under string keys and
//! never looks inside them. [`FileStore`] keeps one file per key on disk;
//! [`MemoryStore`] keeps everything in memory for tests and dry runs.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A string store keyed by name.
pub trait KeyValueStore {
    /// Loads the value for `key`, or `None` if nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Saves `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store with one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create store directory: {}", self.dir.display())
        })?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value).with_context(|| {
            format!("Failed to write temporary store file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename temporary store file to: {}", path.display()))?;

        tracing::debug!(key, path = %path.display(), "Saved store entry");
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Makes a store key safe to use as a file name.
///
/// # Examples
///
/// ```
/// # use pointmap::services::store::sanitize_key;
/// assert_eq!(sanitize_key("apps"), "apps");
/// assert_eq!(sanitize_key("Plant A/apps"), "plant_a_apps");
/// ```
pub fn sanitize_key(key: &str) -> String {
    key.replace(['/', '\\', ':', ' '], "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("apps"), "apps");
        assert_eq!(sanitize_key("a/b\\c:d e"), "a_b_c_d_e");
    }

    #[test]
    fn test_file_store_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store"));
        assert_eq!(store.load("apps").unwrap(), None);
    }

    #[test]
    fn test_file_store_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("store"));

        store.save("apps", "{\"a\":1}").unwrap();
        assert_eq!(store.load("apps").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(store.path_for("apps").exists());
        assert!(!store.path_for("apps").with_extension("json.tmp").exists());

        store.save("apps", "{}").unwrap();
        assert_eq!(store.load("apps").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.load("apps").unwrap(), None);
        store.save("apps", "x").unwrap();
        assert_eq!(store.load("apps").unwrap().as_deref(), Some("x"));
    }
}
