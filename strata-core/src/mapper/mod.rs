//! Entity mapping on top of [`DataMemory`].
//!
//! A [`Mapper`] pairs a [`CodecRegistry`] with the flatten engine: `save`
//! serializes an entity to a section and flattens it under a path, `load`
//! rebuilds the section under that path and deserializes it. A missing codec
//! is never an error; it degrades to a no-op save or an empty load.

pub mod codec;
pub mod registry;

pub use codec::Codec;
pub use registry::{CodecMatch, CodecRegistry};

use std::any::type_name;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::CodecError;
use crate::memory::DataMemory;
use crate::structure::{flatten, unflatten_under_path};
use crate::value::NestedMap;

/// Saves and loads typed entities in path-keyed memory.
#[derive(Debug, Default)]
pub struct Mapper {
    codecs: CodecRegistry,
}

impl Mapper {
    /// Mapper with no codecs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying registry.
    #[must_use]
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Register `codec` for `T`, replacing any earlier one.
    pub fn register_codec<T: 'static>(&self, codec: Codec<T>) {
        self.codecs.register(codec);
    }

    /// Register a codec built from two closures.
    pub fn register<T, S, D>(&self, serialize: S, deserialize: D)
    where
        T: 'static,
        S: Fn(&T) -> Result<NestedMap, CodecError> + Send + Sync + 'static,
        D: Fn(&NestedMap) -> Result<T, CodecError> + Send + Sync + 'static,
    {
        self.codecs.register(Codec::new(serialize, deserialize));
    }

    /// Register the serde-derived codec for `T`.
    pub fn register_serde<T>(&self)
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.codecs.register(Codec::<T>::serde());
    }

    /// See [`CodecRegistry::declare_supertype`].
    pub fn declare_supertype<D, B, U, N>(&self, upcast: U, downcast: N)
    where
        D: 'static,
        B: 'static,
        U: Fn(&D) -> B + Send + Sync + 'static,
        N: Fn(B) -> Option<D> + Send + Sync + 'static,
    {
        self.codecs.declare_supertype::<D, B, U, N>(upcast, downcast);
    }

    /// The codec that would handle `T`, if any.
    #[must_use]
    pub fn find_codec<T: 'static>(&self) -> Option<CodecMatch> {
        self.codecs.find_codec::<T>()
    }

    /// Flatten `entity` into `memory` under `path`.
    ///
    /// Returns `false` when no codec handles `T` or serialization fails;
    /// memory is left untouched in both cases.
    pub fn save<T: 'static>(
        &self,
        memory: &mut (impl DataMemory<str> + ?Sized),
        path: &str,
        entity: &T,
    ) -> bool {
        match self.codecs.serialize(entity) {
            None => {
                debug!(path, entity = type_name::<T>(), "No codec registered; skipping save");
                false
            }
            Some(Err(error)) => {
                warn!(path, entity = type_name::<T>(), error = %error, "Entity serialization failed");
                false
            }
            Some(Ok(section)) => {
                flatten(path, &section, memory);
                true
            }
        }
    }

    /// Load the `T` stored under `path`.
    ///
    /// `None` when no codec handles `T`, nothing is stored under `path`, or
    /// the stored section cannot be turned back into a `T`.
    pub fn load<T: 'static>(&self, memory: &(impl DataMemory<str> + ?Sized), path: &str) -> Option<T> {
        let Some(found) = self.codecs.find_codec::<T>() else {
            debug!(path, entity = type_name::<T>(), "No codec registered; skipping load");
            return None;
        };

        let section = match unflatten_under_path(path, memory) {
            Ok(section) => section,
            Err(error) => {
                warn!(path, error = %error, "Stored section is inconsistent");
                return None;
            }
        };
        if section.is_empty() {
            return None;
        }

        match self.codecs.deserialize::<T>(&section)? {
            Ok(entity) => Some(entity),
            Err(error) => {
                warn!(
                    path,
                    entity = type_name::<T>(),
                    codec = found.type_name,
                    error = %error,
                    "Entity deserialization failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MapMemory;
    use crate::value::Value;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct MySql {
        host: String,
        port: u16,
    }

    fn mysql() -> MySql {
        MySql {
            host: "127.0.0.1".into(),
            port: 3306,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let mapper = Mapper::new();
        mapper.register_serde::<MySql>();
        let mut memory: MapMemory<str> = MapMemory::new();

        assert!(mapper.save(&mut memory, "settings.mysql", &mysql()));
        assert_eq!(memory.get("settings.mysql.host"), Some(&Value::from("127.0.0.1")));
        assert_eq!(memory.get("settings.mysql.port"), Some(&Value::Int(3306)));
        assert_eq!(mapper.load::<MySql>(&memory, "settings.mysql"), Some(mysql()));
    }

    #[test]
    fn codec_miss_is_soft() {
        let mapper = Mapper::new();
        let mut memory: MapMemory<str> = MapMemory::new();
        assert!(!mapper.save(&mut memory, "settings.mysql", &mysql()));
        assert!(memory.is_empty());
        memory.set("settings.mysql.host", Value::from("h"));
        assert_eq!(mapper.load::<MySql>(&memory, "settings.mysql"), None);
    }

    #[test]
    fn empty_path_loads_nothing() {
        let mapper = Mapper::new();
        mapper.register_serde::<MySql>();
        let memory: MapMemory<str> = MapMemory::new();
        assert_eq!(mapper.load::<MySql>(&memory, "settings.mysql"), None);
    }

    #[test]
    fn malformed_section_loads_as_none() {
        let mapper = Mapper::new();
        mapper.register_serde::<MySql>();
        let mut memory: MapMemory<str> = MapMemory::new();
        memory.set("settings.mysql.host", Value::from("h"));
        memory.set("settings.mysql.port", Value::from("not a number"));
        assert_eq!(mapper.load::<MySql>(&memory, "settings.mysql"), None);
    }

    #[test]
    fn blob_values_load_directly() {
        let mapper = Mapper::new();
        mapper.register_serde::<MySql>();
        let mut memory: MapMemory<str> = MapMemory::new();
        let section = Codec::<MySql>::serde().serialize(&mysql()).expect("serialize");
        memory.set("db", Value::Map(section));
        assert_eq!(mapper.load::<MySql>(&memory, "db"), Some(mysql()));
    }
}
