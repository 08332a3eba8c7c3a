//! Recently queried locations, most recent first.

use parking_lot::Mutex;
use std::{fs, io, path::PathBuf, sync::Arc};
use tracing::warn;

use crate::error::WeatherError;

/// Where the recency list is persisted between sessions.
pub trait RecentStore: Send + Sync {
    fn load(&self) -> Result<Vec<String>, WeatherError>;
    fn save(&self, names: &[String]) -> Result<(), WeatherError>;
}

/// Volatile store, used in tests and when no data directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    names: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: &[&str]) -> Self {
        Self { names: Mutex::new(names.iter().map(|n| n.to_string()).collect()) }
    }
}

impl RecentStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>, WeatherError> {
        Ok(self.names.lock().clone())
    }

    fn save(&self, names: &[String]) -> Result<(), WeatherError> {
        *self.names.lock() = names.to_vec();
        Ok(())
    }
}

/// JSON array of names in a file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecentStore for FileStore {
    fn load(&self) -> Result<Vec<String>, WeatherError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(WeatherError::Storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            WeatherError::Storage(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, names: &[String]) -> Result<(), WeatherError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string(names)
            .map_err(|e| WeatherError::Storage(format!("Failed to serialize recent list: {e}")))?;

        fs::write(&self.path, json).map_err(|e| {
            WeatherError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

/// Bounded, deduplicated, most-recent-first list of location names.
pub struct RecentLocations {
    names: Vec<String>,
    store: Arc<dyn RecentStore>,
}

impl std::fmt::Debug for RecentLocations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentLocations").field("names", &self.names).finish()
    }
}

impl RecentLocations {
    pub const CAPACITY: usize = 3;

    /// Load from `store`. Unreadable storage starts an empty list.
    pub fn open(store: Arc<dyn RecentStore>) -> Self {
        let loaded = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not load recent locations, starting empty");
            Vec::new()
        });

        let mut names: Vec<String> = Vec::with_capacity(Self::CAPACITY);
        for name in loaded {
            if !names.contains(&name) && names.len() < Self::CAPACITY {
                names.push(name);
            }
        }

        Self { names, store }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()))
    }

    /// Move or insert `name` at the front, evicting the oldest past capacity.
    pub fn record(&mut self, name: &str) {
        self.insert(name);
        persist(self.store.as_ref(), &self.names);
    }

    /// Same ordering as [`record`](Self::record), without touching the store.
    pub fn insert(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        self.names.insert(0, name.to_string());
        self.names.truncate(Self::CAPACITY);
    }

    /// Handle to the backing store, for persisting outside a lock.
    pub fn store(&self) -> Arc<dyn RecentStore> {
        Arc::clone(&self.store)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Save `names`, logging instead of failing.
pub fn persist(store: &dyn RecentStore, names: &[String]) {
    if let Err(e) = store.save(names) {
        warn!(error = %e, "Could not persist recent locations");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn dedupes_caps_and_orders_most_recent_first() {
        let mut recent = RecentLocations::in_memory();
        for city in ["Paris", "Tokyo", "Paris", "Berlin", "Oslo"] {
            recent.record(city);
        }
        assert_eq!(recent.names(), ["Oslo", "Berlin", "Paris"]);
    }

    #[test]
    fn repeated_name_moves_to_front() {
        let mut recent = RecentLocations::in_memory();
        recent.record("Paris");
        recent.record("Tokyo");
        recent.record("Paris");
        assert_eq!(recent.names(), ["Paris", "Tokyo"]);
    }

    #[test]
    fn record_persists_to_store() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentLocations::open(store.clone());
        recent.record("Lima");
        recent.record("Quito");

        assert_eq!(store.load().expect("memory load"), vec!["Quito", "Lima"]);

        let reopened = RecentLocations::open(store);
        assert_eq!(reopened.names(), ["Quito", "Lima"]);
    }

    #[test]
    fn insert_leaves_store_untouched_until_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentLocations::open(store.clone());
        recent.insert("Lima");
        assert!(store.load().expect("memory load").is_empty());

        persist(recent.store().as_ref(), recent.names());
        assert_eq!(store.load().expect("memory load"), vec!["Lima"]);
    }

    #[test]
    fn open_normalizes_stored_list() {
        let store = MemoryStore::with_names(&["Rome", "Rome", "Oslo", "Kyiv", "Bern"]);
        let recent = RecentLocations::open(Arc::new(store));
        assert_eq!(recent.names(), ["Rome", "Oslo", "Kyiv"]);
    }

    #[test]
    fn file_store_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("recent.json");

        let store = FileStore::new(&path);
        assert!(store.load().expect("missing file is empty").is_empty());

        let mut recent = RecentLocations::open(Arc::new(FileStore::new(&path)));
        recent.record("Paris");
        recent.record("Tokyo");

        let reopened = RecentLocations::open(Arc::new(FileStore::new(&path)));
        assert_eq!(reopened.names(), ["Tokyo", "Paris"]);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recent.json");
        fs::write(&path, "{not json").expect("write");

        assert!(matches!(FileStore::new(&path).load(), Err(WeatherError::Storage(_))));
        assert!(RecentLocations::open(Arc::new(FileStore::new(&path))).is_empty());
    }
}
