//! Synchronous string key-value persistence for the last city and the
//! recent-search list.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::StoreError;

pub const LAST_CITY_KEY: &str = "lastCity";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A JSON object of string values, rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable store file");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = values.len(), "opened store");

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

pub fn last_city(store: &dyn KeyValueStore) -> Option<String> {
    store.get(LAST_CITY_KEY).filter(|c| !c.trim().is_empty())
}

pub fn set_last_city(store: &mut dyn KeyValueStore, city: &str) {
    if let Err(e) = store.set(LAST_CITY_KEY, city) {
        warn!(error = %e, "failed to persist last city");
    }
}

/// Absent or unparseable records read as an empty list.
pub fn recent_searches(store: &dyn KeyValueStore) -> Vec<String> {
    let Some(raw) = store.get(RECENT_SEARCHES_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, "discarding corrupt recent searches record");
            Vec::new()
        }
    }
}

pub fn set_recent_searches(store: &mut dyn KeyValueStore, cities: &[String]) {
    let result = serde_json::to_string(cities)
        .map_err(StoreError::from)
        .and_then(|json| store.set(RECENT_SEARCHES_KEY, &json));

    if let Err(e) = result {
        warn!(error = %e, "failed to persist recent searches");
    }
}

pub fn remove_recent_searches(store: &mut dyn KeyValueStore) {
    if let Err(e) = store.remove(RECENT_SEARCHES_KEY) {
        warn!(error = %e, "failed to remove recent searches");
    }
}
