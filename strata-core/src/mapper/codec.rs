//! Per-type conversion between entities and document sections.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;
use crate::value::{NestedMap, Value};

type SerializeFn<T> = dyn Fn(&T) -> Result<NestedMap, CodecError> + Send + Sync;
type DeserializeFn<T> = dyn Fn(&NestedMap) -> Result<T, CodecError> + Send + Sync;

/// A serialize/deserialize pair for `T`.
///
/// Both directions work on a nested section; the mapper takes care of
/// flattening it into memory under the entity's path.
pub struct Codec<T> {
    serialize: Arc<SerializeFn<T>>,
    deserialize: Arc<DeserializeFn<T>>,
}

impl<T> Codec<T> {
    /// Build a codec from two closures.
    pub fn new<S, D>(serialize: S, deserialize: D) -> Self
    where
        S: Fn(&T) -> Result<NestedMap, CodecError> + Send + Sync + 'static,
        D: Fn(&NestedMap) -> Result<T, CodecError> + Send + Sync + 'static,
    {
        Self {
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// Convert an entity into a section.
    ///
    /// # Errors
    ///
    /// Whatever the serialize closure reports.
    pub fn serialize(&self, entity: &T) -> Result<NestedMap, CodecError> {
        (self.serialize)(entity)
    }

    /// Rebuild an entity from a section.
    ///
    /// # Errors
    ///
    /// Whatever the deserialize closure reports, typically a missing or
    /// mistyped field.
    pub fn deserialize(&self, section: &NestedMap) -> Result<T, CodecError> {
        (self.deserialize)(section)
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> {
    /// Codec derived from the type's serde implementation.
    ///
    /// The entity must serialize to a map. Sequence fields come back as
    /// strings, so they round-trip only for `Vec<String>`-like fields.
    #[must_use]
    pub fn serde() -> Self {
        Self::new(
            |entity: &T| {
                let json = serde_json::to_value(entity)?;
                serde_json::from_value::<Value>(json)?.into_document()
            },
            |section: &NestedMap| {
                let json = serde_json::to_value(section)?;
                Ok(serde_json::from_value(json)?)
            },
        )
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: Arc::clone(&self.serialize),
            deserialize: Arc::clone(&self.deserialize),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
