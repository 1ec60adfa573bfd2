//! The configuration file entity.
//!
//! A [`ConfigFile`] ties together identity metadata, a resolved location on
//! disk and the memory holding its values. It is immutable once built;
//! clones share the same memory.

pub mod builder;
pub mod bundle;
pub mod meta;
pub mod path;

pub use builder::ConfigFileBuilder;
pub use bundle::{DirectoryBundle, EmbeddedBundle, NoBundle, ResourceBundle};
pub use meta::{ConfigMeta, ConfigMetaBuilder};
pub use path::{BaseDir, Fallback, PathProvider};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::memory::{DataMemory, MemoryKey};

/// Memory shared between a file, its clones and the code reading it.
pub type SharedMemory<K> = Arc<RwLock<dyn DataMemory<K> + Send + Sync>>;

/// Put `memory` behind a shared lock.
pub fn shared<K, M>(memory: M) -> SharedMemory<K>
where
    K: MemoryKey + ?Sized,
    M: DataMemory<K> + Send + Sync + 'static,
{
    Arc::new(RwLock::new(memory))
}

/// A configuration file: metadata, location and memory.
pub struct ConfigFile<K: MemoryKey + ?Sized = str> {
    meta: ConfigMeta,
    location: PathBuf,
    memory: SharedMemory<K>,
}

impl<K: MemoryKey + ?Sized> ConfigFile<K> {
    /// Start a builder.
    #[must_use]
    pub fn builder() -> ConfigFileBuilder<K> {
        ConfigFileBuilder::new()
    }

    /// Assemble a file from already validated parts.
    #[must_use]
    pub fn new(meta: ConfigMeta, location: PathBuf, memory: SharedMemory<K>) -> Self {
        Self {
            meta,
            location,
            memory,
        }
    }

    /// Identity metadata.
    #[must_use]
    pub fn meta(&self) -> &ConfigMeta {
        &self.meta
    }

    /// Registry name, shorthand for `meta().name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    /// Absolute location on disk.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Whether the file currently exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.location.is_file()
    }

    /// The file's memory.
    #[must_use]
    pub fn memory(&self) -> &SharedMemory<K> {
        &self.memory
    }
}

impl<K: MemoryKey + ?Sized> Clone for ConfigFile<K> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            location: self.location.clone(),
            memory: Arc::clone(&self.memory),
        }
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ConfigFile<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("meta", &self.meta)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
