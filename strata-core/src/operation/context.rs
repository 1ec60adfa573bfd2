//! A file, its executor and its operations, bundled for chained calls.
//!
//! ```no_run
//! # use strata_core::operation::{CrudOperations, ExecutionContext};
//! # fn demo<O: CrudOperations>(api: &strata_core::ConfigApi, format: O) -> strata_core::Result<()> {
//! ExecutionContext::of(api, "database", format)?
//!     .execute(|ops| ops.create())?
//!     .execute(|ops| ops.read())?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use super::{BasicExecutor, CrudOperations, Operation, OperationExecutor};
use crate::api::ConfigApi;
use crate::error::Result;
use crate::file::ConfigFile;
use crate::memory::MemoryKey;

/// Binds one file to an executor and a set of operations.
pub struct ExecutionContext<O, K: MemoryKey + ?Sized = str> {
    executor: BasicExecutor<K>,
    operations: O,
}

impl<O, K> ExecutionContext<O, K>
where
    O: CrudOperations<K>,
    K: MemoryKey + ?Sized,
{
    /// Context for `file`.
    #[must_use]
    pub fn new(file: Arc<ConfigFile<K>>, operations: O) -> Self {
        Self {
            executor: BasicExecutor::new(file),
            operations,
        }
    }

    /// Context for the file registered as `key` in `api`.
    ///
    /// # Errors
    ///
    /// [`StrataError::NotFound`](crate::StrataError::NotFound) for unknown keys.
    pub fn of(api: &ConfigApi<K>, key: &str, operations: O) -> Result<Self> {
        Ok(Self::new(api.config(key)?, operations))
    }

    /// Pick an operation and run it through the executor.
    ///
    /// # Errors
    ///
    /// The operation's failure, already logged by the executor.
    pub fn execute<F>(&self, select: F) -> Result<&Self>
    where
        F: for<'o> FnOnce(&'o O) -> Operation<'o, K>,
    {
        let operation = select(&self.operations);
        self.executor.execute(&operation)?;
        Ok(self)
    }

    /// The bound file.
    #[must_use]
    pub fn file(&self) -> &Arc<ConfigFile<K>> {
        self.executor.file()
    }

    /// The operations provider.
    #[must_use]
    pub fn operations(&self) -> &O {
        &self.operations
    }

    /// The executor.
    #[must_use]
    pub fn executor(&self) -> &BasicExecutor<K> {
        &self.executor
    }
}

impl<O: fmt::Debug, K: MemoryKey + ?Sized> fmt::Debug for ExecutionContext<O, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("executor", &self.executor)
            .field("operations", &self.operations)
            .finish()
    }
}
