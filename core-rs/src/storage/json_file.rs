/**
 * json_file.rs
 * Directory-backed key-value store
 *
 * Layout:
 *   <dir>/agents.json
 *   <dir>/ports.json
 *   <dir>/lastSelectedCombinationId.json
 *   ...
 *
 * Each write lands in a hidden temp file first and is renamed over the
 * target, so readers see the old or the new collection, never half of one.
 */

use serde_json::Value as JsonValue;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SwitchError};

use super::kv::KeyValueStore;

/// Key-value backend storing one pretty-printed JSON file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if missing) a store rooted at `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                SwitchError::Storage(format!(
                    "Failed to create store directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SwitchError::Storage(format!("Invalid store key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let path = self.path_for(key)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SwitchError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let value = serde_json::from_str(&content).map_err(|e| {
            SwitchError::Storage(format!("Invalid JSON in {}: {}", path.display(), e))
        })?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));

        let json = serde_json::to_string_pretty(&value)?;

        fs::write(&tmp_path, json).map_err(|e| {
            SwitchError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            SwitchError::Storage(format!("Failed to commit {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SwitchError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
