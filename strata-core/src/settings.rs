//! Library-wide defaults, loadable from `strata.toml`.
//!
//! ```toml
//! [general]
//! log_operations = true
//! default_version = "1.0.0"
//!
//! [placeholders]
//! prefix = "{"
//! suffix = "}"
//!
//! [storage]
//! base_dir = "plugins/my-plugin"
//! read_policy = "merge"
//! ```
//!
//! [`StrataSettings::load`] layers `STRATA__<SECTION>__<KEY>` environment
//! variables over the file, e.g. `STRATA__STORAGE__READ_POLICY=merge`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};
use crate::file::{BaseDir, ConfigMeta, PathProvider, meta::DEFAULT_VERSION};
use crate::memory::MapMemory;
use crate::replacement::PlaceholderProcessor;
use crate::source::{DocumentCodec, DocumentSource, ReadPolicy};

/// Environment prefix for [`StrataSettings::load`].
pub const ENV_PREFIX: &str = "STRATA";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrataSettings {
    /// Logging and metadata defaults.
    #[serde(default)]
    pub general: GeneralSettings,
    /// Placeholder delimiters.
    #[serde(default)]
    pub placeholders: PlaceholderSettings,
    /// File locations and read behavior.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl StrataSettings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// Returns `StrataError::Settings` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| StrataError::Settings(e.to_string()))
    }

    /// Read settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StrataError::io("SETTINGS", path, e))?;
        Self::from_toml(&content)
    }

    /// Layered load: built-in defaults, then `path` if it exists, then the
    /// environment.
    ///
    /// # Errors
    /// Returns `StrataError::Settings` if a source is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|layered| layered.try_deserialize::<Self>())
            .map_err(|e| StrataError::Settings(e.to_string()))
    }

    /// Placeholder engine built from the configured delimiters.
    #[must_use]
    pub fn processor(&self) -> PlaceholderProcessor {
        PlaceholderProcessor::new(&self.placeholders.prefix, &self.placeholders.suffix)
    }

    /// Empty path-keyed memory using the configured delimiters.
    #[must_use]
    pub fn memory(&self) -> MapMemory<str> {
        MapMemory::with_processor(Arc::new(self.processor()))
    }

    /// Where relative config paths resolve.
    #[must_use]
    pub fn path_provider(&self) -> BaseDir {
        self.storage
            .base_dir
            .clone()
            .map_or(BaseDir::Current, BaseDir::Custom)
    }

    /// Metadata carrying the configured logging flag and version.
    #[must_use]
    pub fn meta(&self, name: impl Into<String>, relative_path: impl Into<String>) -> ConfigMeta {
        ConfigMeta::new(name, relative_path)
            .with_logging(self.general.log_operations)
            .with_version(self.general.default_version.clone())
    }

    /// Document source for `codec` using the configured read policy.
    #[must_use]
    pub fn source<C: DocumentCodec>(&self, codec: C) -> DocumentSource<C> {
        DocumentSource::new(codec).with_read_policy(self.storage.read_policy)
    }

    /// Resolve `relative` against the configured base directory.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.path_provider().resolve(relative)
    }
}

/// Logging and metadata defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Whether executors log start/finish lines for new files.
    #[serde(default = "default_true")]
    pub log_operations: bool,
    /// Version assigned to new files.
    #[serde(default = "default_version")]
    pub default_version: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_operations: true,
            default_version: default_version(),
        }
    }
}

/// Placeholder delimiters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderSettings {
    /// Opening delimiter.
    #[serde(default = "default_delimiter")]
    pub prefix: String,
    /// Closing delimiter.
    #[serde(default = "default_delimiter")]
    pub suffix: String,
}

impl Default for PlaceholderSettings {
    fn default() -> Self {
        Self {
            prefix: default_delimiter(),
            suffix: default_delimiter(),
        }
    }
}

/// File locations and read behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Base directory; the working directory when unset.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Policy applied by document sources built from these settings.
    #[serde(default)]
    pub read_policy: ReadPolicy,
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    DEFAULT_VERSION.to_owned()
}

fn default_delimiter() -> String {
    "%".to_owned()
}
