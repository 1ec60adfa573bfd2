//! JSON via `serde_json`.

use strata_core::error::CodecError;
use strata_core::source::DocumentCodec;
use strata_core::value::{NestedMap, Value};

/// Pretty-printed JSON objects, written with a trailing newline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn decode(&self, text: &str) -> Result<NestedMap, CodecError> {
        serde_json::from_str::<Value>(text)?.into_document()
    }

    fn encode(&self, document: &NestedMap) -> Result<String, CodecError> {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        Ok(text)
    }
}
