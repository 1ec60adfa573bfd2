//! Error types for the strata core library.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by user-supplied codecs and document formats.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for all strata operations.
#[derive(Error, Debug)]
pub enum StrataError {
    /// A builder was finalised without one or more required components.
    #[error("Invalid {target}: missing {}", .missing.join(", "))]
    Validation {
        /// What was being built.
        target: &'static str,
        /// Names of the absent components.
        missing: Vec<&'static str>,
    },

    /// Nothing is registered under the requested key.
    #[error("No configuration registered with key: {0}")]
    NotFound(String),

    /// Disk access failed during a lifecycle operation.
    #[error("I/O failure during {operation} of {}: {source}", .path.display())]
    Io {
        /// Operation that was running (`CREATE`, `READ`, ...).
        operation: &'static str,
        /// Resource being touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be decoded or encoded.
    #[error("Malformed {format} document at {}: {source}", .path.display())]
    Format {
        /// Format name (`yaml`, `json`, ...).
        format: &'static str,
        /// Resource being decoded or encoded.
        path: PathBuf,
        /// Error reported by the format codec.
        #[source]
        source: CodecError,
    },

    /// Two flat keys disagree on whether a path is a leaf or a section.
    #[error("Flat key `{key}` collides with an existing {existing} at `{at}`")]
    KeyCollision {
        /// The key being materialised.
        key: String,
        /// Path prefix where the collision happened.
        at: String,
        /// What already occupied that position (`value` or `section`).
        existing: &'static str,
    },

    /// A flat key is not a valid dot path.
    #[error("Invalid flat key `{0}`: empty path segment")]
    InvalidKey(String),

    /// A propagating lifecycle hook failed.
    #[error("Lifecycle hook {hook} failed: {message}")]
    Hook {
        /// Hook name.
        hook: &'static str,
        /// Failure description.
        message: String,
    },

    /// Settings could not be loaded.
    #[error("Settings error: {0}")]
    Settings(String),
}

impl StrataError {
    /// Build an [`StrataError::Io`] from an I/O error.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Build a [`StrataError::Hook`] from any displayable failure.
    pub fn hook(hook: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Hook {
            hook,
            message: message.to_string(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, StrataError>;
