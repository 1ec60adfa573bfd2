//! Default content shipped alongside the application.
//!
//! `create` consults a [`ResourceBundle`] for the relative path of the file
//! being created and copies whatever it returns.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;

/// Lookup of bundled default resources by relative path.
pub trait ResourceBundle: Send + Sync {
    /// Open the default content for `relative`, or `None` if there is none.
    fn open(&self, relative: &str) -> Option<Box<dyn Read + '_>>;
}

/// Bundle with no resources; created files start empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundle;

impl ResourceBundle for NoBundle {
    fn open(&self, _relative: &str) -> Option<Box<dyn Read + '_>> {
        None
    }
}

/// Resources compiled into the binary, typically with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    resources: HashMap<String, &'static [u8]>,
}

impl EmbeddedBundle {
    /// Empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource.
    #[must_use]
    pub fn with(mut self, relative: impl Into<String>, content: &'static [u8]) -> Self {
        self.resources.insert(relative.into(), content);
        self
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn open(&self, relative: &str) -> Option<Box<dyn Read + '_>> {
        self.resources
            .get(relative)
            .map(|content| Box::new(Cursor::new(*content)) as Box<dyn Read>)
    }
}

/// Resources stored as plain files under a directory.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    /// Bundle rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceBundle for DirectoryBundle {
    fn open(&self, relative: &str) -> Option<Box<dyn Read + '_>> {
        File::open(self.root.join(relative))
            .ok()
            .map(|file| Box::new(file) as Box<dyn Read>)
    }
}
