//! # Strata Formats
//!
//! Concrete [`DocumentCodec`]s for `strata-core`'s generic document source:
//!
//! - [`YamlCodec`] (`serde_yaml`)
//! - [`JsonCodec`] (`serde_json`, pretty printed)
//! - [`TomlCodec`] (`toml`; nulls are dropped on write)
//!
//! [`for_path`] picks a codec from a file extension, so callers that only
//! know a file name can still build a [`DocumentSource`].
//!
//! ```
//! use strata_core::source::DocumentCodec;
//! use strata_formats::YamlCodec;
//!
//! let doc = YamlCodec.decode("network:\n  max-players: 20\n").expect("yaml");
//! assert!(doc.contains_key("network"));
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod json;
pub mod toml;
pub mod yaml;

use std::path::Path;

use strata_core::error::CodecError;
use strata_core::source::{DocumentCodec, DocumentSource};
use strata_core::value::NestedMap;
use tracing::debug;

pub use json::JsonCodec;
pub use toml::TomlCodec;
pub use yaml::YamlCodec;

/// YAML document source.
pub type YamlSource = DocumentSource<YamlCodec>;
/// JSON document source.
pub type JsonSource = DocumentSource<JsonCodec>;
/// TOML document source.
pub type TomlSource = DocumentSource<TomlCodec>;
/// Document source whose format was chosen at runtime.
pub type AnySource = DocumentSource<AnyCodec>;

/// One of the shipped codecs, chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyCodec {
    /// `.yml` / `.yaml`
    Yaml(YamlCodec),
    /// `.json`
    Json(JsonCodec),
    /// `.toml`
    Toml(TomlCodec),
}

impl AnyCodec {
    fn inner(&self) -> &dyn DocumentCodec {
        match self {
            Self::Yaml(codec) => codec,
            Self::Json(codec) => codec,
            Self::Toml(codec) => codec,
        }
    }
}

impl DocumentCodec for AnyCodec {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn extension(&self) -> &'static str {
        self.inner().extension()
    }

    fn decode(&self, text: &str) -> Result<NestedMap, CodecError> {
        self.inner().decode(text)
    }

    fn encode(&self, document: &NestedMap) -> Result<String, CodecError> {
        self.inner().encode(document)
    }
}

/// Codec matching the extension of `path`, case-insensitively.
#[must_use]
pub fn for_path(path: impl AsRef<Path>) -> Option<AnyCodec> {
    let path = path.as_ref();
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let codec = match extension.as_str() {
        "yml" | "yaml" => AnyCodec::Yaml(YamlCodec),
        "json" => AnyCodec::Json(JsonCodec),
        "toml" => AnyCodec::Toml(TomlCodec),
        _ => {
            debug!(path = %path.display(), extension = %extension, "No codec for extension");
            return None;
        }
    };
    Some(codec)
}

/// [`DocumentSource`] for the format implied by `path`.
#[must_use]
pub fn source_for(path: impl AsRef<Path>) -> Option<AnySource> {
    for_path(path).map(DocumentSource::new)
}
