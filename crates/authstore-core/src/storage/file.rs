//! File-backed storage.
//!
//! The whole store is one JSON object mapping keys to string values. Every
//! write goes to a temp file in the same directory and is renamed over the
//! existing file, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::Storage;

/// Storage file name in the data directory
pub const STORAGE_FILE: &str = "storage.json";

pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse storage file {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = values.len(), "Storage opened");
        Ok(Self { path, values })
    }

    /// Open `storage.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::open(dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).context("Failed to write storage temp file")?;
        std::fs::rename(&tmp, &self.path).context("Failed to replace storage file")?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            match previous {
                Some(v) => self.values.insert(key.to_string(), v),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self.values.remove(key) {
            Some(previous) => {
                if let Err(e) = self.persist() {
                    self.values.insert(key.to_string(), previous);
                    return Err(e);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path()).unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::in_dir(dir.path()).unwrap();
        storage.set("token", "T1").unwrap();
        storage.set("refresh_token", "R1").unwrap();

        let reopened = FileStorage::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("T1"));
        assert_eq!(reopened.get("refresh_token").unwrap().as_deref(), Some("R1"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::in_dir(dir.path()).unwrap();
        storage.set("token", "T1").unwrap();
        storage.remove("token").unwrap();
        storage.remove("never-set").unwrap();

        let reopened = FileStorage::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap(), None);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::in_dir(dir.path()).unwrap();
        storage.set("token", "T1").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![STORAGE_FILE.to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "not json").unwrap();
        assert!(FileStorage::in_dir(dir.path()).is_err());
    }
}
