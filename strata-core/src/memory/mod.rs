//! In-memory key → [`Value`] storage and its typed accessors.
//!
//! [`DataMemory`] is the capability interface every store exposes. Only the
//! raw map operations are required; the typed getters and templated
//! accessors are provided on top of them, so a single generic store
//! ([`MapMemory`]) serves string paths, enum keys and anything else that is
//! hashable.
//!
//! The key parameter is the *lookup* form of the key: `str` for path keyed
//! memories, the enum itself for enum keyed ones. Keys are stored in their
//! owned form.

pub mod entity;
pub mod entry;
pub mod map;

pub use entity::EntityMemory;
pub use entry::{MemoryDataType, MemoryEntry};
pub use map::MapMemory;

use std::hash::Hash;

use crate::replacement::{Replacement, ReplacementProcessor};
use crate::value::Value;

/// Lookup form of a memory key (`str`, an enum, ...).
pub trait MemoryKey: ToOwned + Eq + Hash {}

impl<T: ?Sized + ToOwned + Eq + Hash> MemoryKey for T {}

/// A typed key-value store.
///
/// `get` never mutates; `set` overwrites without merging. Implementations
/// are plain in-process maps: nothing here blocks or performs I/O.
pub trait DataMemory<K: MemoryKey + ?Sized> {
    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: &K, value: Value);

    /// Raw value under `key`.
    fn get(&self, key: &K) -> Option<&Value>;

    /// Whether `key` is present (even if it holds [`Value::Null`]).
    fn contains(&self, key: &K) -> bool;

    /// Remove and return the value under `key`.
    fn remove(&mut self, key: &K) -> Option<Value>;

    /// Keys under `path`.
    ///
    /// Map-backed memories are flat, so they return every stored key
    /// regardless of `path` and `deep`; callers filter by prefix.
    fn keys(&self, path: &K, deep: bool) -> Vec<K::Owned>;

    /// Snapshot of every stored (key, value) pair.
    fn entries(&self) -> Vec<(K::Owned, Value)>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    /// Whether the memory holds nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored value.
    fn clear(&mut self);

    /// Placeholder engine used by the templated accessors.
    fn processor(&self) -> &dyn ReplacementProcessor;

    /// Raw value, or `default` when absent or null.
    fn get_or(&self, key: &K, default: Value) -> Value {
        match self.get(key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => default,
        }
    }

    /// Displayable form of the value; `None` when absent or null.
    fn get_string(&self, key: &K) -> Option<String> {
        self.get(key).and_then(Value::to_display)
    }

    /// Displayable form of the value, or `default`.
    fn get_string_or(&self, key: &K, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_owned())
    }

    /// Displayable form with placeholders substituted, or `default` untouched.
    fn get_string_with(&self, key: &K, default: &str, replacements: &[Replacement]) -> String {
        match self.get_string(key) {
            Some(text) => self.transform(&text, replacements),
            None => default.to_owned(),
        }
    }

    /// Integer value (floats truncate), or `default` for any other shape.
    fn get_int(&self, key: &K, default: i64) -> i64 {
        self.get(key).and_then(Value::coerce_int).unwrap_or(default)
    }

    /// Boolean value, or `default` for any other shape.
    fn get_bool(&self, key: &K, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Floating point value (integers widen), or `default` for any other shape.
    fn get_double(&self, key: &K, default: f64) -> f64 {
        self.get(key).and_then(Value::coerce_f64).unwrap_or(default)
    }

    /// String list value; `None` when absent or not a list.
    fn get_string_list(&self, key: &K) -> Option<Vec<String>> {
        self.get(key)
            .and_then(Value::as_string_list)
            .map(<[String]>::to_vec)
    }

    /// String list value, or `default`.
    fn get_string_list_or(&self, key: &K, default: Vec<String>) -> Vec<String> {
        self.get_string_list(key).unwrap_or(default)
    }

    /// String list with placeholders substituted per line; empty when absent.
    fn get_string_list_with(&self, key: &K, replacements: &[Replacement]) -> Vec<String> {
        let Some(lines) = self.get_string_list(key) else {
            return Vec::new();
        };
        if replacements.is_empty() {
            return lines;
        }
        self.processor().process_lines(&lines, replacements)
    }

    /// Substitute placeholders in `text` with this memory's processor.
    fn transform(&self, text: &str, replacements: &[Replacement]) -> String {
        if replacements.is_empty() {
            return text.to_owned();
        }
        self.processor().process(text, replacements)
    }
}
