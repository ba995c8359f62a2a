use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{info, warn};

use crate::{error::ConsoleError, model::ProductionResult};

pub const LAST_PRODUCTION_RESULT_KEY: &str = "last_production_result";

/// String key/value store that survives restarts.
pub trait LocalStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: String) -> Result<(), ConsoleError>;
    fn remove(&self, key: &str) -> Result<(), ConsoleError>;
}

impl<T> LocalStore for Arc<T>
where
    T: LocalStore + ?Sized,
{
    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn set_string(&self, key: &str, value: String) -> Result<(), ConsoleError> {
        (**self).set_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        (**self).remove(key)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_string(&self, key: &str, value: String) -> Result<(), ConsoleError> {
        lock(&self.entries).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON object on disk, one string value per key. Loaded once on open and
/// rewritten in full (temp file + rename) on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), "local storage file is corrupt, starting empty: {err}");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), ConsoleError> {
        let storage_error = |action: &str, err: std::io::Error| {
            ConsoleError::Storage(format!(
                "failed to {action} local storage file '{}': {err}",
                self.path.display()
            ))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| storage_error("create directory for", err))?;
        }
        let serialized = serde_json::to_string_pretty(entries)
            .map_err(|err| ConsoleError::Storage(format!("failed to encode local storage: {err}")))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|err| storage_error("write", err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| storage_error("replace", err))?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_string(&self, key: &str, value: String) -> Result<(), ConsoleError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// Mirror of the last production result in a [`LocalStore`]. The store is a
/// cache; the remote endpoint stays authoritative.
#[derive(Debug, Clone)]
pub struct ProductionResultCache<S> {
    store: S,
}

impl<S: LocalStore> ProductionResultCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Absent, unparsable, or invalid values all read as "no prior
    /// production". Bad values are removed so they are not re-read.
    pub fn load(&self) -> Option<ProductionResult> {
        let raw = self.store.get_string(LAST_PRODUCTION_RESULT_KEY)?;
        match serde_json::from_str::<ProductionResult>(&raw) {
            Ok(result) if result.is_valid() => Some(result),
            Ok(_) => {
                warn!("discarding invalid cached production result");
                self.discard();
                None
            }
            Err(err) => {
                warn!("discarding corrupt cached production result: {err}");
                self.discard();
                None
            }
        }
    }

    pub fn save(&self, result: &ProductionResult) -> Result<(), ConsoleError> {
        let serialized = serde_json::to_string(result).map_err(|err| {
            ConsoleError::Storage(format!("failed to encode production result: {err}"))
        })?;
        self.store.set_string(LAST_PRODUCTION_RESULT_KEY, serialized)
    }

    pub fn invalidate(&self) -> Result<(), ConsoleError> {
        self.store.remove(LAST_PRODUCTION_RESULT_KEY)
    }

    fn discard(&self) {
        if let Err(err) = self.invalidate() {
            warn!("failed to remove cached production result: {err}");
        }
    }
}

/// The single "current production result". Memory and cache move together;
/// a cache write failure is logged and the in-memory value still updates.
#[derive(Debug)]
pub struct ResultSlot<S> {
    cache: ProductionResultCache<S>,
    current: Option<ProductionResult>,
}

impl<S: LocalStore> ResultSlot<S> {
    pub fn restore(cache: ProductionResultCache<S>) -> Self {
        let current = cache.load();
        if let Some(result) = &current {
            info!(push_id = %result.push_id, "restored last production result");
        }
        Self { cache, current }
    }

    pub fn current(&self) -> Option<&ProductionResult> {
        self.current.as_ref()
    }

    pub fn cache(&self) -> &ProductionResultCache<S> {
        &self.cache
    }

    pub fn set(&mut self, result: ProductionResult) {
        if let Err(err) = self.cache.save(&result) {
            warn!("failed to persist production result: {err}");
        }
        self.current = Some(result);
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.cache.invalidate() {
            warn!("failed to clear cached production result: {err}");
        }
        self.current = None;
    }
}

#[cfg(test)]
#[path = "tests/result_cache_tests.rs"]
mod tests;
