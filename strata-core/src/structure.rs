//! Conversion between nested documents and flat dot-path keys.
//!
//! `{"network": {"server-ip": "10.0.0.1"}}` flattens to
//! `network.server-ip → "10.0.0.1"`. Sequences are leaves: they are stored
//! whole and never expanded element-wise.
//!
//! Unflattening is strict. A key set in which one key is both a leaf and a
//! section (`a = 1` next to `a.b = 2`) is rejected rather than resolved by
//! insertion order, and empty segments (`a..b`, `.a`) are invalid.

use crate::error::{Result, StrataError};
use crate::memory::DataMemory;
use crate::value::{FlatMap, NestedMap, Value};

/// Path separator for flat keys.
pub const SEPARATOR: char = '.';

/// Join a prefix and a key into a flat path.
#[must_use]
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

fn walk(prefix: &str, map: &NestedMap, visit: &mut dyn FnMut(String, &Value)) {
    for (key, value) in map {
        let full_key = join_path(prefix, key);
        match value {
            Value::Map(section) => walk(&full_key, section, visit),
            leaf => visit(full_key, leaf),
        }
    }
}

/// Write every leaf of `map` into `sink`, keyed by its path under `prefix`.
///
/// Empty sections produce no keys.
pub fn flatten(prefix: &str, map: &NestedMap, sink: &mut (impl DataMemory<str> + ?Sized)) {
    walk(prefix, map, &mut |key, value| sink.set(&key, value.clone()));
}

/// Flatten `map` into a standalone [`FlatMap`], preserving document order.
#[must_use]
pub fn flatten_to_map(prefix: &str, map: &NestedMap) -> FlatMap {
    let mut flat = FlatMap::new();
    walk(prefix, map, &mut |key, value| {
        flat.insert(key, value.clone());
    });
    flat
}

/// Rebuild a nested document from a flat map.
///
/// # Errors
///
/// See [`unflatten_entries`].
pub fn unflatten(flat: &FlatMap) -> Result<NestedMap> {
    unflatten_entries(flat.iter().map(|(key, value)| (key.as_str(), value.clone())))
}

/// Rebuild a nested document from (flat key, value) pairs.
///
/// A repeated key overwrites the earlier leaf.
///
/// # Errors
///
/// - [`StrataError::InvalidKey`] when a key has an empty segment.
/// - [`StrataError::KeyCollision`] when a key needs a section where a leaf
///   already sits, or a leaf where a section already sits.
pub fn unflatten_entries<I, S>(entries: I) -> Result<NestedMap>
where
    I: IntoIterator<Item = (S, Value)>,
    S: AsRef<str>,
{
    let mut root = NestedMap::new();
    for (key, value) in entries {
        insert_path(&mut root, key.as_ref(), value)?;
    }
    Ok(root)
}

fn insert_path(root: &mut NestedMap, key: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = key.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(StrataError::InvalidKey(key.to_owned()));
    }
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(StrataError::InvalidKey(key.to_owned()));
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry((*segment).to_owned())
            .or_insert_with(|| Value::Map(NestedMap::new()));
        match slot {
            Value::Map(section) => current = section,
            _ => {
                return Err(StrataError::KeyCollision {
                    key: key.to_owned(),
                    at: segments[..=depth].join("."),
                    existing: "value",
                });
            }
        }
    }

    if matches!(current.get(*leaf), Some(Value::Map(_))) {
        return Err(StrataError::KeyCollision {
            key: key.to_owned(),
            at: key.to_owned(),
            existing: "section",
        });
    }
    current.insert((*leaf).to_owned(), value);
    Ok(())
}

/// Rebuild the section stored under `path` in `memory`.
///
/// Collects every key starting with `path.`, strips that prefix and
/// unflattens the rest in memory order. When no child keys exist but
/// `path` itself holds a [`Value::Map`], that map is returned as-is. An empty
/// `path` rebuilds the whole memory.
///
/// # Errors
///
/// Propagates [`unflatten_entries`] errors.
pub fn unflatten_under_path(
    path: &str,
    memory: &(impl DataMemory<str> + ?Sized),
) -> Result<NestedMap> {
    let prefix = format!("{path}{SEPARATOR}");
    let children: Vec<(String, Value)> = memory
        .entries()
        .into_iter()
        .filter_map(|(key, value)| {
            if path.is_empty() {
                Some((key, value))
            } else {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_owned(), value))
            }
        })
        .collect();

    if children.is_empty() {
        if let Some(Value::Map(section)) = memory.get(path) {
            return Ok(section.clone());
        }
        return Ok(NestedMap::new());
    }

    unflatten_entries(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MapMemory;

    fn network() -> NestedMap {
        let mut inner = NestedMap::new();
        inner.insert("server-ip".into(), Value::from("10.0.0.1"));
        inner.insert("max-players".into(), Value::from(20));
        let mut root = NestedMap::new();
        root.insert("network".into(), Value::Map(inner));
        root
    }

    #[test]
    fn flatten_writes_dot_paths() {
        let mut memory: MapMemory<str> = MapMemory::new();
        flatten("", &network(), &mut memory);
        assert_eq!(memory.get("network.server-ip"), Some(&Value::from("10.0.0.1")));
        assert_eq!(memory.get("network.max-players"), Some(&Value::Int(20)));
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn flatten_respects_prefix_and_keeps_lists_whole() {
        let mut doc = NestedMap::new();
        doc.insert("motd".into(), Value::from(vec!["a", "b"]));
        let flat = flatten_to_map("messages", &doc);
        assert_eq!(flat.get("messages.motd"), Some(&Value::from(vec!["a", "b"])));
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn unflatten_under_path_rebuilds_section() {
        let mut memory: MapMemory<str> = MapMemory::new();
        flatten("", &network(), &mut memory);
        let section = unflatten_under_path("network", &memory).expect("section");
        assert_eq!(section.get("server-ip"), Some(&Value::from("10.0.0.1")));
        assert_eq!(section.get("max-players"), Some(&Value::Int(20)));
        assert_eq!(section.len(), 2);
    }

    #[test]
    fn unflatten_under_path_ignores_lookalike_prefixes() {
        let mut memory: MapMemory<str> = MapMemory::new();
        memory.set("network.port", Value::from(1));
        memory.set("networking.port", Value::from(2));
        let section = unflatten_under_path("network", &memory).expect("section");
        assert_eq!(section.len(), 1);
        assert_eq!(section["port"], Value::Int(1));
    }

    #[test]
    fn unflatten_under_path_returns_stored_blob() {
        let mut memory: MapMemory<str> = MapMemory::new();
        let blob = network();
        memory.set("cached", Value::Map(blob.clone()));
        assert_eq!(unflatten_under_path("cached", &memory).expect("blob"), blob);
        assert!(unflatten_under_path("missing", &memory).expect("empty").is_empty());
    }

    #[test]
    fn unflatten_preserves_order() {
        let mut flat = FlatMap::new();
        flat.insert("z.b".into(), Value::from(1));
        flat.insert("a".into(), Value::from(2));
        flat.insert("z.a".into(), Value::from(3));
        let nested = unflatten(&flat).expect("nested");
        let top: Vec<&str> = nested.keys().map(String::as_str).collect();
        assert_eq!(top, ["z", "a"]);
        let inner: Vec<&str> = nested["z"]
            .as_map()
            .expect("section")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(inner, ["b", "a"]);
    }

    #[test]
    fn leaf_then_section_collides() {
        let err = unflatten_entries([("a", Value::from(1)), ("a.b", Value::from(2))])
            .expect_err("collision");
        assert!(matches!(
            err,
            StrataError::KeyCollision { ref at, existing: "value", .. } if at == "a"
        ));
    }

    #[test]
    fn section_then_leaf_collides() {
        let err = unflatten_entries([("a.b.c", Value::from(1)), ("a.b", Value::from(2))])
            .expect_err("collision");
        assert!(matches!(err, StrataError::KeyCollision { existing: "section", .. }));
    }

    #[test]
    fn empty_segments_are_invalid() {
        for key in ["", "a..b", ".a", "a."] {
            let err = unflatten_entries([(key, Value::Null)]).expect_err("invalid");
            assert!(matches!(err, StrataError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[test]
    fn repeated_leaf_keeps_last_value() {
        let nested = unflatten_entries([("a", Value::from(1)), ("a", Value::from(2))])
            .expect("nested");
        assert_eq!(nested["a"], Value::Int(2));
    }

    #[test]
    fn sections_keep_memory_order() {
        let mut memory: MapMemory<str> = MapMemory::new();
        memory.set("network.server-ip", Value::from("10.0.0.1"));
        memory.set("network.max-players", Value::from(20));
        memory.set("network.port", Value::from(1));
        let section = unflatten_under_path("network", &memory).expect("section");
        let keys: Vec<&str> = section.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["server-ip", "max-players", "port"]);
    }
}
