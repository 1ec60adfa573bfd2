//! TOML via the `toml` crate.
//!
//! TOML has no null, so null values are dropped when encoding. Datetimes
//! decode to their RFC 3339 text. Arrays of tables are rejected since a
//! document value cannot hold a list of sections.

use strata_core::error::CodecError;
use strata_core::source::DocumentCodec;
use strata_core::value::{NestedMap, Value};

/// TOML documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl DocumentCodec for TomlCodec {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extension(&self) -> &'static str {
        "toml"
    }

    fn decode(&self, text: &str) -> Result<NestedMap, CodecError> {
        let table: ::toml::Table = text.parse()?;
        table_to_document(table)
    }

    fn encode(&self, document: &NestedMap) -> Result<String, CodecError> {
        Ok(::toml::to_string(&without_nulls(document))?)
    }
}

fn table_to_document(table: ::toml::Table) -> Result<NestedMap, CodecError> {
    let mut document = NestedMap::with_capacity(table.len());
    for (key, value) in table {
        let value = to_value(value).map_err(|e| format!("`{key}`: {e}"))?;
        document.insert(key, value);
    }
    Ok(document)
}

fn to_value(value: ::toml::Value) -> Result<Value, CodecError> {
    Ok(match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Int(i),
        ::toml::Value::Float(x) => Value::Float(x),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        ::toml::Value::Array(items) => Value::StringList(
            items
                .into_iter()
                .map(scalar_text)
                .collect::<Result<_, _>>()?,
        ),
        ::toml::Value::Table(table) => Value::Map(table_to_document(table)?),
    })
}

fn scalar_text(item: ::toml::Value) -> Result<String, CodecError> {
    match item {
        ::toml::Value::String(s) => Ok(s),
        ::toml::Value::Array(_) | ::toml::Value::Table(_) => {
            Err("nested collections inside arrays are not supported".into())
        }
        scalar => Ok(scalar.to_string()),
    }
}

fn without_nulls(document: &NestedMap) -> NestedMap {
    document
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Map(section) => Some((key.clone(), Value::Map(without_nulls(section)))),
            other => Some((key.clone(), other.clone())),
        })
        .collect()
}
