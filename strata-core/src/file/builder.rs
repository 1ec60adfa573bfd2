//! Validating builder for [`ConfigFile`].

use std::fmt;
use std::sync::Arc;

use super::{ConfigFile, ConfigMeta, PathProvider, SharedMemory, shared};
use crate::error::{Result, StrataError};
use crate::memory::{DataMemory, MemoryKey};

/// Collects the three parts of a [`ConfigFile`]; `build` checks all are set.
pub struct ConfigFileBuilder<K: MemoryKey + ?Sized = str> {
    meta: Option<ConfigMeta>,
    memory: Option<SharedMemory<K>>,
    provider: Option<Arc<dyn PathProvider>>,
}

impl<K: MemoryKey + ?Sized> ConfigFileBuilder<K> {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: None,
            memory: None,
            provider: None,
        }
    }

    /// Identity metadata.
    #[must_use]
    pub fn meta(mut self, meta: ConfigMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Fresh memory owned by the file.
    #[must_use]
    pub fn memory<M>(mut self, memory: M) -> Self
    where
        M: DataMemory<K> + Send + Sync + 'static,
    {
        self.memory = Some(shared(memory));
        self
    }

    /// Memory already shared with other code.
    #[must_use]
    pub fn shared_memory(mut self, memory: SharedMemory<K>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Where the relative path is resolved.
    #[must_use]
    pub fn at(mut self, provider: impl PathProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Finish the file.
    ///
    /// # Errors
    ///
    /// [`StrataError::Validation`] naming every missing component.
    pub fn build(self) -> Result<ConfigFile<K>> {
        match (self.meta, self.memory, self.provider) {
            (Some(meta), Some(memory), Some(provider)) => {
                let location = provider.resolve(meta.relative_path());
                Ok(ConfigFile::new(meta, location, memory))
            }
            (meta, memory, provider) => {
                let missing = [
                    (meta.is_none(), "meta"),
                    (memory.is_none(), "memory"),
                    (provider.is_none(), "location"),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(StrataError::Validation {
                    target: "config file",
                    missing,
                })
            }
        }
    }
}

impl<K: MemoryKey + ?Sized> Default for ConfigFileBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ConfigFileBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFileBuilder")
            .field("meta", &self.meta)
            .field("memory", &self.memory.is_some())
            .field("location", &self.provider.is_some())
            .finish()
    }
}
