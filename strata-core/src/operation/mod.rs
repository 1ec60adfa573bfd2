//! Create / read / update / delete as deferred, named commands.
//!
//! A format implements [`ConfigFormat`] (how to read and write its content)
//! plus whichever [`LifecycleHooks`] it cares about, and gets
//! [`CrudOperations`] for free. Each operation is an [`Operation`]: a unit
//! of work that is not bound to any file until it is executed, so one
//! format instance serves every file of that format.
//!
//! ```text
//! NotPresent ──create──▶ Present ──read/update──▶ Present ──delete──▶ NotPresent
//! ```

pub mod context;
pub mod executor;
pub mod lifecycle;

pub use context::ExecutionContext;
pub use executor::{BasicExecutor, OperationExecutor};

use std::fmt;

use crate::error::Result;
use crate::file::{ConfigFile, NoBundle, ResourceBundle};
use crate::memory::MemoryKey;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What an [`Operation`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Materialize the file on disk.
    Create,
    /// Load the file into memory.
    Read,
    /// Persist memory to the file.
    Update,
    /// Remove the file and clear memory.
    Delete,
    /// Anything else, named by the caller.
    Custom(&'static str),
}

impl OperationKind {
    /// Upper-case name used in logs and errors.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Custom(name) => *name,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Action<'a, K> = dyn Fn(&ConfigFile<K>) -> Result<()> + 'a;

/// A named unit of work runnable against any [`ConfigFile`].
pub struct Operation<'a, K: MemoryKey + ?Sized = str> {
    kind: OperationKind,
    action: Box<Action<'a, K>>,
}

impl<'a, K: MemoryKey + ?Sized> Operation<'a, K> {
    /// Wrap `action` as an operation of the given kind.
    pub fn new(kind: OperationKind, action: impl Fn(&ConfigFile<K>) -> Result<()> + 'a) -> Self {
        Self {
            kind,
            action: Box::new(action),
        }
    }

    /// Kind of work performed.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Display name (`CREATE`, `READ`, ...).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Run against `file`.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped action reports.
    pub fn execute(&self, file: &ConfigFile<K>) -> Result<()> {
        (self.action)(file)
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for Operation<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Factory for the four lifecycle operations.
pub trait CrudOperations<K: MemoryKey + ?Sized = str> {
    /// Create the file if it does not exist yet.
    fn create(&self) -> Operation<'_, K>;
    /// Load the file into memory.
    fn read(&self) -> Operation<'_, K>;
    /// Write memory back to the file.
    fn update(&self) -> Operation<'_, K>;
    /// Delete the file and clear memory.
    fn delete(&self) -> Operation<'_, K>;
}

/// Extension points around the lifecycle. Every hook defaults to a no-op.
///
/// `on_pre_create`, `on_pre_delete` and `on_post_delete` propagate their
/// errors and abort the operation. The `on_post_create`, `on_post_read` and
/// `on_post_update` notifications are fire-and-forget: a failure is logged
/// and the operation still succeeds.
pub trait LifecycleHooks<K: MemoryKey + ?Sized = str> {
    /// Before anything is touched by `create`.
    ///
    /// # Errors
    ///
    /// Aborts the create.
    fn on_pre_create(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }

    /// After `create` produced a new file. Notification only.
    ///
    /// # Errors
    ///
    /// Logged, never propagated.
    fn on_post_create(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }

    /// Before `delete` removes anything.
    ///
    /// # Errors
    ///
    /// Aborts the delete.
    fn on_pre_delete(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }

    /// After `delete` removed an existing file.
    ///
    /// # Errors
    ///
    /// Returned from the delete, after memory has been cleared.
    fn on_post_delete(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }

    /// After `read` loaded content. Notification only.
    ///
    /// # Errors
    ///
    /// Logged, never propagated.
    fn on_post_read(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }

    /// After `update` wrote content. Notification only.
    ///
    /// # Errors
    ///
    /// Logged, never propagated.
    fn on_post_update(&self, _file: &ConfigFile<K>) -> Result<()> {
        Ok(())
    }
}

/// A document format: how content moves between disk and memory.
pub trait ConfigFormat<K: MemoryKey + ?Sized = str>: LifecycleHooks<K> {
    /// Load the file's content into its memory.
    ///
    /// Returns `Ok(false)` when there was nothing to load.
    ///
    /// # Errors
    ///
    /// I/O or decoding failures.
    fn read_into(&self, file: &ConfigFile<K>) -> Result<bool>;

    /// Persist the file's memory.
    ///
    /// Returns `Ok(false)` when nothing was written.
    ///
    /// # Errors
    ///
    /// I/O or encoding failures.
    fn write_from(&self, file: &ConfigFile<K>) -> Result<bool>;

    /// Where `create` looks for default content.
    fn bundle(&self) -> &dyn ResourceBundle {
        &NoBundle
    }
}

impl<K, F> CrudOperations<K> for F
where
    K: MemoryKey + ?Sized,
    F: ConfigFormat<K>,
{
    fn create(&self) -> Operation<'_, K> {
        Operation::new(OperationKind::Create, move |file| lifecycle::create(self, file))
    }

    fn read(&self) -> Operation<'_, K> {
        Operation::new(OperationKind::Read, move |file| lifecycle::read(self, file))
    }

    fn update(&self) -> Operation<'_, K> {
        Operation::new(OperationKind::Update, move |file| lifecycle::update(self, file))
    }

    fn delete(&self) -> Operation<'_, K> {
        Operation::new(OperationKind::Delete, move |file| lifecycle::delete(self, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_upper_case() {
        assert_eq!(OperationKind::Create.to_string(), "CREATE");
        assert_eq!(OperationKind::Delete.to_string(), "DELETE");
        assert_eq!(OperationKind::Custom("RELOAD").to_string(), "RELOAD");
    }

    #[test]
    fn operations_are_unbound_until_executed() {
        use crate::file::{ConfigMeta, shared};
        use crate::memory::MapMemory;
        use crate::value::Value;
        use std::path::PathBuf;

        let op: Operation<'_> = Operation::new(OperationKind::Custom("TOUCH"), |file| {
            file.memory().write().set("touched", Value::from(true));
            Ok(())
        });
        let first: ConfigFile = ConfigFile::new(
            ConfigMeta::new("a", "a.yml"),
            PathBuf::from("a.yml"),
            shared(MapMemory::<str>::new()),
        );
        let second: ConfigFile = ConfigFile::new(
            ConfigMeta::new("b", "b.yml"),
            PathBuf::from("b.yml"),
            shared(MapMemory::<str>::new()),
        );
        op.execute(&first).expect("first");
        op.execute(&second).expect("second");
        assert!(first.memory().read().get_bool("touched", false));
        assert!(second.memory().read().get_bool("touched", false));
        assert_eq!(op.name(), "TOUCH");
    }
}
