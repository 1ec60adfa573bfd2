//! The generic map-backed [`DataMemory`].

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{DataMemory, MemoryKey};
use crate::replacement::{PlaceholderProcessor, ReplacementProcessor};
use crate::value::Value;

/// Insertion-ordered memory for any key type.
///
/// `MapMemory<str>` holds flat dot paths, `MapMemory<MyEnum>` holds enum
/// keyed slots. The replacement processor defaults to `%key%` placeholders.
pub struct MapMemory<K: MemoryKey + ?Sized> {
    storage: IndexMap<K::Owned, Value>,
    processor: Arc<dyn ReplacementProcessor>,
}

impl<K> MapMemory<K>
where
    K: MemoryKey + ?Sized,
    K::Owned: Eq + Hash,
{
    /// Empty memory with `%key%` placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_processor(Arc::new(PlaceholderProcessor::percent()))
    }

    /// Empty memory with a custom placeholder engine.
    #[must_use]
    pub fn with_processor(processor: Arc<dyn ReplacementProcessor>) -> Self {
        Self {
            storage: IndexMap::new(),
            processor,
        }
    }

    /// Borrow the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &IndexMap<K::Owned, Value> {
        &self.storage
    }
}

impl<K> Default for MapMemory<K>
where
    K: MemoryKey + ?Sized,
    K::Owned: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for MapMemory<K>
where
    K: MemoryKey + ?Sized,
    K::Owned: Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<K> fmt::Debug for MapMemory<K>
where
    K: MemoryKey + ?Sized,
    K::Owned: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapMemory")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl<K> DataMemory<K> for MapMemory<K>
where
    K: MemoryKey + ?Sized,
    K::Owned: Eq + Hash + Clone,
{
    fn set(&mut self, key: &K, value: Value) {
        self.storage.insert(key.to_owned(), value);
    }

    fn get(&self, key: &K) -> Option<&Value> {
        self.storage.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.storage.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> Option<Value> {
        self.storage.shift_remove(key)
    }

    fn keys(&self, _path: &K, _deep: bool) -> Vec<K::Owned> {
        self.storage.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(K::Owned, Value)> {
        self.storage
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.storage.len()
    }

    fn clear(&mut self) {
        self.storage.clear();
    }

    fn processor(&self) -> &dyn ReplacementProcessor {
        self.processor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replacement::Replacement;

    #[test]
    fn keys_ignore_the_path_argument() {
        let mut memory: MapMemory<str> = MapMemory::new();
        memory.set("a.b", Value::from(1));
        memory.set("c", Value::from(2));
        let mut keys = memory.keys("a", true);
        keys.sort();
        assert_eq!(keys, vec!["a.b".to_owned(), "c".to_owned()]);
    }

    #[test]
    fn custom_processor_is_used_for_templates() {
        let mut memory: MapMemory<str> =
            MapMemory::with_processor(Arc::new(PlaceholderProcessor::brackets()));
        memory.set("greeting", Value::from("hi {name} %name%"));
        let out = memory.get_string_with("greeting", "", &[Replacement::new("name", "Ayla")]);
        assert_eq!(out, "hi Ayla %name%");
    }

    #[test]
    fn remove_and_entries() {
        let mut memory: MapMemory<str> = MapMemory::new();
        memory.set("x", Value::from(1));
        memory.set("y", Value::from(2));
        assert_eq!(memory.remove("x"), Some(Value::from(1)));
        assert_eq!(memory.entries(), vec![("y".to_owned(), Value::from(2))]);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn keys_keep_insertion_order_across_removal() {
        let mut memory: MapMemory<str> = MapMemory::new();
        for key in ["zeta", "alpha", "mid", "beta"] {
            memory.set(key, Value::from(1));
        }
        memory.remove("alpha");
        memory.set("zeta", Value::from(2));
        let keys: Vec<String> = memory.entries().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["zeta", "mid", "beta"]);
    }
}
