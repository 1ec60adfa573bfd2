//! The context object handed to code that needs registered configs.
//!
//! There is no process-wide instance: build one [`ConfigApi`] at startup and
//! pass it (or clones of it) to whoever needs it.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::event::{ConfigEvent, EventSink, NoopSink};
use crate::file::ConfigFile;
use crate::memory::MemoryKey;
use crate::registry::ConfigRegistry;

/// Registry plus event sink, cheap to clone.
pub struct ConfigApi<K: MemoryKey + ?Sized = str> {
    registry: Arc<ConfigRegistry<K>>,
    events: Arc<dyn EventSink<K>>,
}

impl<K: MemoryKey + ?Sized + 'static> ConfigApi<K> {
    /// Fresh registry, events discarded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_events(Arc::new(NoopSink))
    }

    /// Fresh registry publishing to `events`.
    #[must_use]
    pub fn with_events(events: Arc<dyn EventSink<K>>) -> Self {
        Self::from_parts(Arc::new(ConfigRegistry::new()), events)
    }
}

impl<K: MemoryKey + ?Sized> ConfigApi<K> {
    /// Assemble from an existing registry and sink.
    #[must_use]
    pub fn from_parts(registry: Arc<ConfigRegistry<K>>, events: Arc<dyn EventSink<K>>) -> Self {
        Self { registry, events }
    }

    /// The shared registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConfigRegistry<K>> {
        &self.registry
    }

    /// The shared event sink.
    #[must_use]
    pub fn events(&self) -> &Arc<dyn EventSink<K>> {
        &self.events
    }

    /// Registered file by name.
    ///
    /// # Errors
    ///
    /// [`StrataError::NotFound`](crate::StrataError::NotFound) for unknown names.
    pub fn config(&self, key: &str) -> Result<Arc<ConfigFile<K>>> {
        self.registry.get(key)
    }

    /// Publish `event` through the sink.
    ///
    /// # Errors
    ///
    /// Sink delivery failures.
    pub fn publish(&self, event: &ConfigEvent<K>) -> Result<()> {
        self.events.publish(event)
    }
}

impl<K: MemoryKey + ?Sized + 'static> Default for ConfigApi<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MemoryKey + ?Sized> Clone for ConfigApi<K> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            events: Arc::clone(&self.events),
        }
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ConfigApi<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigApi")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::mpsc;

    use super::*;
    use crate::event::{ChannelSink, ConfigEventKind};
    use crate::file::{ConfigMeta, shared};
    use crate::memory::MapMemory;

    #[test]
    fn clones_share_registry_and_sink() {
        let (tx, rx) = mpsc::channel::<ConfigEvent>();
        let api: ConfigApi = ConfigApi::with_events(Arc::new(ChannelSink::new(tx)));
        let other = api.clone();

        let file: ConfigFile = ConfigFile::new(
            ConfigMeta::new("main", "main.yml"),
            PathBuf::from("main.yml"),
            shared(MapMemory::<str>::new()),
        );
        api.registry().register_file(file.clone());
        assert_eq!(other.config("main").expect("registered").name(), "main");
        assert!(other.config("missing").is_err());

        other
            .publish(&ConfigEvent::new(ConfigEventKind::Loaded, file))
            .expect("publish");
        assert_eq!(rx.recv().expect("event").kind(), ConfigEventKind::Loaded);
    }
}
