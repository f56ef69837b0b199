//! Key/value storage with browser-like lifetimes: local storage survives
//! restarts in a JSON file, session storage lives as long as the process.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Default location under the user's data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("backroom").join("storage.json"))
    }

    /// Open (or start) the store at `path`. Unreadable files start empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: Some(path),
            values,
        }
    }

    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Could not create storage directory")?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)
            .with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    values: HashMap<String, String>,
}

impl SessionStorage {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("backroom-storage-{}-{}", std::process::id(), name))
            .join("storage.json")
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut storage = LocalStorage::open(path.clone());
        storage.set("greeting", "hello").unwrap();

        let reopened = LocalStorage::open(path.clone());
        assert_eq!(reopened.get("greeting"), Some("hello"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = scratch_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let storage = LocalStorage::open(path.clone());
        assert_eq!(storage.get("anything"), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
