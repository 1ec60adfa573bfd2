//! Static, typed descriptors for frequently read memory keys.
//!
//! ```
//! use strata_core::memory::{DataMemory, MapMemory, MemoryEntry};
//! use strata_core::value::Value;
//!
//! const MAX_PLAYERS: MemoryEntry<i64> = MemoryEntry::integer("network.max-players");
//!
//! let mut memory: MapMemory<str> = MapMemory::new();
//! memory.set("network.max-players", Value::from(20));
//! assert_eq!(MAX_PLAYERS.fetch(&memory), Some(20));
//! ```

use std::marker::PhantomData;

use super::DataMemory;
use crate::value::{FromValue, NestedMap, Value};

/// Retrieval strategy for a memory key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryDataType {
    /// Displayable text.
    String,
    /// Integer, `0` when missing.
    Integer,
    /// Boolean, `false` when missing.
    Boolean,
    /// Floating point, `0.0` when missing.
    Double,
    /// List of strings.
    StringList,
    /// Raw value, no coercion.
    Raw,
}

impl MemoryDataType {
    /// Pull the value under `key` out of `memory` using this strategy.
    pub fn extract(self, memory: &(impl DataMemory<str> + ?Sized), key: &str) -> Value {
        match self {
            Self::String => memory.get_string(key).into(),
            Self::Integer => Value::Int(memory.get_int(key, 0)),
            Self::Boolean => Value::Bool(memory.get_bool(key, false)),
            Self::Double => Value::Float(memory.get_double(key, 0.0)),
            Self::StringList => memory.get_string_list(key).into(),
            Self::Raw => memory.get(key).cloned().unwrap_or_default(),
        }
    }
}

/// A flat key paired with the strategy used to read it.
///
/// Entries carry no state of their own; they only spare callers from
/// repeating untyped key lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEntry<T> {
    key: &'static str,
    kind: MemoryDataType,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryEntry<T> {
    const fn of(key: &'static str, kind: MemoryDataType) -> Self {
        Self {
            key,
            kind,
            _marker: PhantomData,
        }
    }

    /// The flat key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The retrieval strategy.
    #[must_use]
    pub const fn kind(&self) -> MemoryDataType {
        self.kind
    }
}

impl MemoryEntry<String> {
    /// Text entry.
    #[must_use]
    pub const fn string(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::String)
    }
}

impl MemoryEntry<i64> {
    /// Integer entry.
    #[must_use]
    pub const fn integer(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::Integer)
    }
}

impl MemoryEntry<bool> {
    /// Boolean entry.
    #[must_use]
    pub const fn boolean(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::Boolean)
    }
}

impl MemoryEntry<f64> {
    /// Floating point entry.
    #[must_use]
    pub const fn double(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::Double)
    }
}

impl MemoryEntry<Vec<String>> {
    /// String list entry.
    #[must_use]
    pub const fn string_list(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::StringList)
    }
}

impl MemoryEntry<Value> {
    /// Raw value entry.
    #[must_use]
    pub const fn raw(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::Raw)
    }
}

impl MemoryEntry<NestedMap> {
    /// Raw entry expected to hold a whole section.
    #[must_use]
    pub const fn section(key: &'static str) -> Self {
        Self::of(key, MemoryDataType::Raw)
    }
}

impl<T: FromValue> MemoryEntry<T> {
    /// Read the entry from `memory`.
    pub fn fetch(&self, memory: &(impl DataMemory<str> + ?Sized)) -> Option<T> {
        T::from_value(&self.kind.extract(memory, self.key))
    }

    /// Read the entry, substituting `default` when nothing usable is stored.
    pub fn fetch_or(&self, memory: &(impl DataMemory<str> + ?Sized), default: T) -> T {
        self.fetch(memory).unwrap_or(default)
    }

    /// Read the entry together with the key it came from.
    pub fn fetch_detailed(
        &self,
        memory: &(impl DataMemory<str> + ?Sized),
    ) -> (&'static str, Option<T>) {
        (self.key, self.fetch(memory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MapMemory;

    const SERVER_IP: MemoryEntry<String> = MemoryEntry::string("network.server-ip");
    const MAX_PLAYERS: MemoryEntry<i64> = MemoryEntry::integer("network.max-players");
    const WHITELIST: MemoryEntry<bool> = MemoryEntry::boolean("network.whitelist");
    const TPS: MemoryEntry<f64> = MemoryEntry::double("network.tps");
    const ADMINS: MemoryEntry<Vec<String>> = MemoryEntry::string_list("network.admins");
    const RAW_PORT: MemoryEntry<Value> = MemoryEntry::raw("network.port");

    fn memory() -> MapMemory<str> {
        let mut memory = MapMemory::new();
        memory.set("network.server-ip", Value::from("10.0.0.1"));
        memory.set("network.max-players", Value::from(20));
        memory.set("network.admins", Value::from(vec!["ayla", "bo"]));
        memory.set("network.port", Value::from(25565));
        memory
    }

    #[test]
    fn typed_entries_fetch_their_type() {
        let memory = memory();
        assert_eq!(SERVER_IP.fetch(&memory).as_deref(), Some("10.0.0.1"));
        assert_eq!(MAX_PLAYERS.fetch(&memory), Some(20));
        assert_eq!(ADMINS.fetch(&memory), Some(vec!["ayla".to_owned(), "bo".to_owned()]));
        assert_eq!(RAW_PORT.fetch(&memory), Some(Value::Int(25565)));
    }

    #[test]
    fn numeric_and_flag_entries_have_built_in_defaults() {
        let memory = memory();
        assert_eq!(WHITELIST.fetch(&memory), Some(false));
        assert_eq!(TPS.fetch(&memory), Some(0.0));
    }

    #[test]
    fn fetch_or_only_applies_when_nothing_usable() {
        let memory = MapMemory::<str>::new();
        assert_eq!(SERVER_IP.fetch_or(&memory, "127.0.0.1".to_owned()), "127.0.0.1");
        assert_eq!(MAX_PLAYERS.fetch_or(&memory, 99), 0);
    }

    #[test]
    fn detailed_fetch_pairs_key_and_value() {
        let memory = memory();
        assert_eq!(MAX_PLAYERS.fetch_detailed(&memory), ("network.max-players", Some(20)));
        assert_eq!(MAX_PLAYERS.kind(), MemoryDataType::Integer);
    }

    #[test]
    fn data_type_works_as_a_key() {
        let mut slots: MapMemory<MemoryDataType> = MapMemory::new();
        slots.set(&MemoryDataType::String, Value::from("Welcome %user%!"));
        slots.set(&MemoryDataType::Integer, Value::from(150));
        assert_eq!(slots.get_int(&MemoryDataType::Integer, 0), 150);
    }
}
