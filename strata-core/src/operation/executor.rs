//! Running operations against a bound file.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use super::Operation;
use crate::error::Result;
use crate::file::ConfigFile;
use crate::memory::MemoryKey;

/// Runs [`Operation`]s. Failures are reported and re-raised, never retried.
pub trait OperationExecutor<K: MemoryKey + ?Sized = str> {
    /// Run one operation.
    ///
    /// # Errors
    ///
    /// The operation's own failure.
    fn execute(&self, operation: &Operation<'_, K>) -> Result<()>;

    /// Run operations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first failing operation's error.
    fn execute_all(&self, operations: &[Operation<'_, K>]) -> Result<()> {
        operations.iter().try_for_each(|operation| self.execute(operation))
    }
}

/// Executor bound to a single file.
///
/// Start and finish lines are logged at info when the file's metadata has
/// logging enabled. Failures are always logged at error.
pub struct BasicExecutor<K: MemoryKey + ?Sized = str> {
    file: Arc<ConfigFile<K>>,
}

impl<K: MemoryKey + ?Sized> BasicExecutor<K> {
    /// Executor for `file`.
    #[must_use]
    pub fn new(file: Arc<ConfigFile<K>>) -> Self {
        Self { file }
    }

    /// The bound file.
    #[must_use]
    pub fn file(&self) -> &Arc<ConfigFile<K>> {
        &self.file
    }
}

impl<K: MemoryKey + ?Sized> OperationExecutor<K> for BasicExecutor<K> {
    fn execute(&self, operation: &Operation<'_, K>) -> Result<()> {
        let meta = self.file.meta();
        let verbose = meta.logging_enabled();
        if verbose {
            info!(config = %meta.name(), operation = %operation.kind(), "Starting operation");
        }

        match operation.execute(&self.file) {
            Ok(()) => {
                if verbose {
                    info!(config = %meta.name(), operation = %operation.kind(), "Finished operation");
                }
                Ok(())
            }
            Err(err) => {
                error!(
                    config = %meta.name(),
                    operation = %operation.kind(),
                    path = %self.file.location().display(),
                    error = %err,
                    "Operation failed"
                );
                Err(err)
            }
        }
    }
}

impl<K: MemoryKey + ?Sized> Clone for BasicExecutor<K> {
    fn clone(&self) -> Self {
        Self {
            file: Arc::clone(&self.file),
        }
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for BasicExecutor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicExecutor")
            .field("file", &self.file)
            .finish()
    }
}
