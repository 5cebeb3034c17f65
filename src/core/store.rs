//! Durable key-value state: library index, requests and sync interval.
//!
//! Each key lives in its own `<key>.json` under the data directory and is
//! replaced atomically on every write.

use crate::models::library::LibraryIndex;
use crate::models::request::PendingRequest;
use crate::utils::fs::write_atomic;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const KEY_LIBRARY_INDEX: &str = "library_index";
pub const KEY_REQUESTS: &str = "requests";
pub const KEY_SYNC_INTERVAL: &str = "sync_interval";

/// JSON file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a key. A missing file is `None`; a corrupt one is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| crate::Error::Store(format!("{}: {}", path.display(), e)))
    }

    /// Replace a key.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_vec_pretty(value)?;
        write_atomic(&self.path(key), &content)
    }

    pub fn library_index(&self) -> Result<Option<LibraryIndex>> {
        self.get(KEY_LIBRARY_INDEX)
    }

    pub fn set_library_index(&self, index: &LibraryIndex) -> Result<()> {
        self.set(KEY_LIBRARY_INDEX, index)
    }

    pub fn requests(&self) -> Result<Vec<PendingRequest>> {
        Ok(self.get(KEY_REQUESTS)?.unwrap_or_default())
    }

    pub fn set_requests(&self, requests: &[PendingRequest]) -> Result<()> {
        self.set(KEY_REQUESTS, requests)
    }

    /// Persisted sync interval in minutes.
    pub fn sync_interval(&self) -> Result<Option<u32>> {
        self.get(KEY_SYNC_INTERVAL)
    }

    pub fn set_sync_interval(&self, minutes: u32) -> Result<()> {
        self.set(KEY_SYNC_INTERVAL, &minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_keys() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());
        assert!(store.library_index().unwrap().is_none());
        assert!(store.requests().unwrap().is_empty());
        assert!(store.sync_interval().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_keys() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());

        let index: LibraryIndex = ["movie_550", "tv_1396_s1_e1"].into_iter().collect();
        store.set_library_index(&index).unwrap();
        store
            .set_requests(&[PendingRequest::new("550", MediaKind::Movie, "Fight Club", "alice")])
            .unwrap();
        store.set_sync_interval(30).unwrap();

        assert_eq!(store.library_index().unwrap(), Some(index));
        assert_eq!(store.requests().unwrap().len(), 1);
        assert_eq!(store.sync_interval().unwrap(), Some(30));
    }

    #[test]
    fn test_index_file_is_key_array() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());
        store
            .set_library_index(&["movie_1"].into_iter().collect())
            .unwrap();
        let raw = std::fs::read_to_string(dir.path().join("library_index.json")).unwrap();
        let keys: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(keys, vec!["movie_1"]);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("requests.json"), "{not json").unwrap();
        let store = StateStore::new(dir.path());
        assert!(store.requests().is_err());
    }
}
