//! Shared fixtures for the Strata benchmarks.

use strata_core::value::{NestedMap, Value};

/// Document with `sections` top-level sections of `keys` scalar entries
/// each, plus one nested `limits` section per top-level section.
#[must_use]
pub fn server_document(sections: usize, keys: usize) -> NestedMap {
    (0..sections)
        .map(|s| {
            let mut section: NestedMap = (0..keys)
                .map(|k| (format!("key-{k}"), Value::from(format!("value {s}/{k} for %user%"))))
                .collect();
            let mut limits = NestedMap::new();
            limits.insert("max-players".into(), Value::Int(20));
            limits.insert("ratio".into(), Value::Float(0.75));
            section.insert("limits".into(), Value::Map(limits));
            (format!("section-{s}"), Value::Map(section))
        })
        .collect()
}
