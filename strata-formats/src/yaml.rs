//! YAML via `serde_yaml`.

use strata_core::error::CodecError;
use strata_core::source::DocumentCodec;
use strata_core::value::{NestedMap, Value};

/// Block-style YAML documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extension(&self) -> &'static str {
        "yml"
    }

    fn decode(&self, text: &str) -> Result<NestedMap, CodecError> {
        serde_yaml::from_str::<Value>(text)?.into_document()
    }

    fn encode(&self, document: &NestedMap) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(document)?)
    }
}
