//! Name → [`ConfigFile`] registry shared across threads.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{Result, StrataError};
use crate::file::ConfigFile;
use crate::memory::MemoryKey;

/// Concurrent registry of configuration files, one per name.
pub struct ConfigRegistry<K: MemoryKey + ?Sized = str> {
    entries: DashMap<String, Arc<ConfigFile<K>>>,
}

impl<K: MemoryKey + ?Sized> ConfigRegistry<K> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register `file` under `key`, replacing and returning any previous entry.
    pub fn register(
        &self,
        key: impl Into<String>,
        file: impl Into<Arc<ConfigFile<K>>>,
    ) -> Option<Arc<ConfigFile<K>>> {
        let key = key.into();
        let previous = self.entries.insert(key.clone(), file.into());
        if previous.is_some() {
            debug!(key = %key, "Replaced registered config");
        }
        previous
    }

    /// Register `file` under its own name.
    pub fn register_file(&self, file: impl Into<Arc<ConfigFile<K>>>) -> Option<Arc<ConfigFile<K>>> {
        let file = file.into();
        self.register(file.name().to_owned(), file)
    }

    /// Remove `key`; no-op when absent.
    pub fn unregister(&self, key: &str) -> Option<Arc<ConfigFile<K>>> {
        self.entries.remove(key).map(|(_, file)| file)
    }

    /// Whether `key` is registered.
    #[must_use]
    pub fn has_entry(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The file registered under `key`.
    ///
    /// # Errors
    ///
    /// [`StrataError::NotFound`] when nothing is registered under `key`.
    pub fn get(&self, key: &str) -> Result<Arc<ConfigFile<K>>> {
        self.entries
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StrataError::NotFound(key.to_owned()))
    }

    /// Snapshot of every (key, file) pair. Later changes are not reflected.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Arc<ConfigFile<K>>)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Number of registered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: MemoryKey + ?Sized> Default for ConfigRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ConfigRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}
