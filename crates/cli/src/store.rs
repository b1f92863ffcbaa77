//! File-backed state store: one `<key>.json` file per key under a directory

use greenbench_core::error::{Error as CoreError, Result as CoreResult};
use greenbench_core::StateStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory of JSON documents, one per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write to a sibling temp file, then rename over the target
    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CoreError::FileWriteError {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        std::fs::write(&tmp, value).map_err(|e| CoreError::FileWriteError {
            path: tmp.display().to_string(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| CoreError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenbench_core::history::{HistoryStore, HISTORY_KEY};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get("benchmarkHistory").is_none());
    }

    #[test]
    fn test_set_creates_dir_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("state"));

        store.set("currentBenchmarkResult", "{\"a\":1}").unwrap();
        store.set("currentBenchmarkResult", "{\"a\":2}").unwrap();

        assert_eq!(store.get("currentBenchmarkResult").unwrap(), "{\"a\":2}");
        assert!(store.dir().join("currentBenchmarkResult.json").exists());
        assert!(!store.dir().join("currentBenchmarkResult.json.tmp").exists());
    }

    #[test]
    fn test_key_is_sanitized() {
        let store = FileStore::new("/state");
        assert_eq!(
            store.path_for("../escape/me"),
            PathBuf::from("/state/___escape_me.json")
        );
    }

    #[test]
    fn test_corrupt_history_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        fs::write(store.path_for(HISTORY_KEY), "not json at all").unwrap();

        let history = HistoryStore::new(store);
        assert!(history.load().is_empty());
    }
}
