//! Strategies for locating configuration files on disk.

use std::fs;
use std::path::{Path, PathBuf};

/// Resolves relative configuration paths against a base directory.
pub trait PathProvider: Send + Sync {
    /// Directory every relative path is resolved against.
    fn base_directory(&self) -> PathBuf;

    /// Absolute location of `relative`.
    fn resolve(&self, relative: &str) -> PathBuf {
        self.base_directory().join(relative)
    }
}

/// The stock base directories.
///
/// Process-dependent directories are looked up on every resolution, so a
/// changed working directory is picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseDir {
    /// The process working directory (`.` if it cannot be determined).
    Current,
    /// The system temporary directory.
    Temp,
    /// The user's home directory (`$HOME`, then `%USERPROFILE%`, then `.`).
    Home,
    /// A fixed directory.
    Custom(PathBuf),
}

impl BaseDir {
    /// A fixed directory.
    #[must_use]
    pub fn custom(path: impl Into<PathBuf>) -> Self {
        Self::Custom(path.into())
    }
}

impl PathProvider for BaseDir {
    fn base_directory(&self) -> PathBuf {
        match self {
            Self::Current => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            Self::Temp => std::env::temp_dir(),
            Self::Home => std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
            Self::Custom(path) => path.clone(),
        }
    }
}

/// Uses `primary` while its directory exists and is writable, else `secondary`.
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P: PathProvider, S: PathProvider> Fallback<P, S> {
    /// Chain two providers.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

fn is_writable_dir(dir: &Path) -> bool {
    fs::metadata(dir).is_ok_and(|meta| meta.is_dir() && !meta.permissions().readonly())
}

impl<P: PathProvider, S: PathProvider> PathProvider for Fallback<P, S> {
    fn base_directory(&self) -> PathBuf {
        let primary = self.primary.base_directory();
        if is_writable_dir(&primary) {
            primary
        } else {
            self.secondary.base_directory()
        }
    }
}

impl<P, S> std::fmt::Debug for Fallback<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fallback").finish_non_exhaustive()
    }
}
