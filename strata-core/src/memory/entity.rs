//! Path-keyed memory that also stores typed entities.

use std::sync::Arc;

use super::{DataMemory, MapMemory};
use crate::mapper::Mapper;
use crate::replacement::ReplacementProcessor;
use crate::value::Value;

/// [`MapMemory<str>`] bound to a shared [`Mapper`].
///
/// Behaves exactly like the plain memory for raw values and adds
/// [`set_entity`](Self::set_entity) / [`get_entity`](Self::get_entity) for
/// anything the mapper has a codec for.
#[derive(Debug, Clone)]
pub struct EntityMemory {
    inner: MapMemory<str>,
    mapper: Arc<Mapper>,
}

impl EntityMemory {
    /// Empty memory using `mapper` for entities.
    #[must_use]
    pub fn new(mapper: Arc<Mapper>) -> Self {
        Self::with_memory(MapMemory::new(), mapper)
    }

    /// Wrap an existing memory.
    #[must_use]
    pub fn with_memory(inner: MapMemory<str>, mapper: Arc<Mapper>) -> Self {
        Self { inner, mapper }
    }

    /// The mapper entities go through.
    #[must_use]
    pub fn mapper(&self) -> &Arc<Mapper> {
        &self.mapper
    }

    /// Store `entity` flattened under `path`. `false` on codec miss.
    pub fn set_entity<T: 'static>(&mut self, path: &str, entity: &T) -> bool {
        let mapper = Arc::clone(&self.mapper);
        mapper.save(&mut self.inner, path, entity)
    }

    /// Rebuild the `T` stored under `path`.
    #[must_use]
    pub fn get_entity<T: 'static>(&self, path: &str) -> Option<T> {
        self.mapper.load(&self.inner, path)
    }
}

impl DataMemory<str> for EntityMemory {
    fn set(&mut self, key: &str, value: Value) {
        self.inner.set(key, value);
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    fn keys(&self, path: &str, deep: bool) -> Vec<String> {
        self.inner.keys(path, deep)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.inner.entries()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn processor(&self) -> &dyn ReplacementProcessor {
        self.inner.processor()
    }
}
