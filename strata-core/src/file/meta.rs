//! Identity metadata of a configuration file.

use crate::error::{Result, StrataError};

/// Version assigned when none is given.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Name, location and logging preferences of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMeta {
    name: String,
    relative_path: String,
    logging_enabled: bool,
    version: String,
}

impl ConfigMeta {
    /// Metadata with logging on and the default version.
    #[must_use]
    pub fn new(name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            logging_enabled: true,
            version: DEFAULT_VERSION.to_owned(),
        }
    }

    /// Start a validating builder.
    #[must_use]
    pub fn builder() -> ConfigMetaBuilder {
        ConfigMetaBuilder::default()
    }

    /// Registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path relative to the provider's base directory, e.g. `settings/db.yml`.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Whether executors log start/finish lines for this file.
    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Free-form version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Toggle executor logging.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Replace the version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Builder for [`ConfigMeta`] that reports every missing field at once.
#[derive(Debug, Clone)]
pub struct ConfigMetaBuilder {
    name: Option<String>,
    relative_path: Option<String>,
    logging_enabled: bool,
    version: String,
}

impl Default for ConfigMetaBuilder {
    fn default() -> Self {
        Self {
            name: None,
            relative_path: None,
            logging_enabled: true,
            version: DEFAULT_VERSION.to_owned(),
        }
    }
}

impl ConfigMetaBuilder {
    /// Registry name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Relative path of the file.
    #[must_use]
    pub fn relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    /// Executor logging.
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Version string.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Finish the metadata.
    ///
    /// # Errors
    ///
    /// [`StrataError::Validation`] when the name or the path is missing or blank.
    pub fn build(self) -> Result<ConfigMeta> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let relative_path = self.relative_path.filter(|p| !p.trim().is_empty());

        match (name, relative_path) {
            (Some(name), Some(relative_path)) => Ok(ConfigMeta {
                name,
                relative_path,
                logging_enabled: self.logging_enabled,
                version: self.version,
            }),
            (name, path) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if path.is_none() {
                    missing.push("relative path");
                }
                Err(StrataError::Validation {
                    target: "config meta",
                    missing,
                })
            }
        }
    }
}
