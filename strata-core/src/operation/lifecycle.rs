//! The lifecycle algorithms behind the blanket [`CrudOperations`] impl.
//!
//! [`CrudOperations`]: super::CrudOperations

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::{ConfigFormat, OperationKind};
use crate::error::{Result, StrataError};
use crate::file::{ConfigFile, ResourceBundle};
use crate::memory::MemoryKey;

/// Log a failed notification hook; notifications never fail an operation.
pub fn notify<K: MemoryKey + ?Sized>(hook: &'static str, file: &ConfigFile<K>, outcome: Result<()>) {
    if let Err(error) = outcome {
        warn!(config = %file.name(), hook, error = %error, "Notification hook failed");
    }
}

/// Materialize the file.
///
/// 1. `on_pre_create` (propagating).
/// 2. An existing file is left untouched and no further hook runs.
/// 3. Parent directories are created, then the bundled default is copied.
///    A missing or unreadable default yields an empty file instead.
/// 4. `on_post_create` (notification).
///
/// # Errors
///
/// Pre-hook failures, or I/O failures creating directories or the file.
pub fn create<K, F>(format: &F, file: &ConfigFile<K>) -> Result<()>
where
    K: MemoryKey + ?Sized,
    F: ConfigFormat<K> + ?Sized,
{
    format.on_pre_create(file)?;

    let path = file.location();
    if path.exists() {
        debug!(config = %file.name(), path = %path.display(), "File already exists; nothing to create");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StrataError::io(OperationKind::Create.as_str(), parent, e))?;
    }

    if !copy_default(format.bundle(), file.meta().relative_path(), path) {
        File::create(path).map_err(|e| StrataError::io(OperationKind::Create.as_str(), path, e))?;
    }

    notify("on_post_create", file, format.on_post_create(file));
    Ok(())
}

/// Copy the bundled resource for `relative` to `target`. `false` when the
/// bundle has none or the copy failed.
fn copy_default(bundle: &dyn ResourceBundle, relative: &str, target: &Path) -> bool {
    let Some(mut resource) = bundle.open(relative) else {
        return false;
    };
    let copied = File::create(target).and_then(|mut out| io::copy(&mut resource, &mut out));
    match copied {
        Ok(bytes) => {
            debug!(path = %target.display(), bytes, "Copied bundled default");
            true
        }
        Err(error) => {
            warn!(
                path = %target.display(),
                error = %error,
                "Could not copy bundled default; creating an empty file"
            );
            false
        }
    }
}

/// Load content and fire `on_post_read` when anything was loaded.
///
/// # Errors
///
/// Whatever [`ConfigFormat::read_into`] reports.
pub fn read<K, F>(format: &F, file: &ConfigFile<K>) -> Result<()>
where
    K: MemoryKey + ?Sized,
    F: ConfigFormat<K> + ?Sized,
{
    if format.read_into(file)? {
        notify("on_post_read", file, format.on_post_read(file));
    }
    Ok(())
}

/// Persist memory and fire `on_post_update` when anything was written.
///
/// # Errors
///
/// Whatever [`ConfigFormat::write_from`] reports.
pub fn update<K, F>(format: &F, file: &ConfigFile<K>) -> Result<()>
where
    K: MemoryKey + ?Sized,
    F: ConfigFormat<K> + ?Sized,
{
    if format.write_from(file)? {
        notify("on_post_update", file, format.on_post_update(file));
    }
    Ok(())
}

/// Remove the file and clear memory.
///
/// 1. `on_pre_delete` (propagating).
/// 2. An existing file is removed, then `on_post_delete` runs.
/// 3. Memory is cleared whether or not a file existed, and even when
///    `on_post_delete` failed; that failure is returned afterwards.
///
/// # Errors
///
/// Pre-hook failures, removal failures, or the post-hook failure.
pub fn delete<K, F>(format: &F, file: &ConfigFile<K>) -> Result<()>
where
    K: MemoryKey + ?Sized,
    F: ConfigFormat<K> + ?Sized,
{
    format.on_pre_delete(file)?;

    let path = file.location();
    let mut outcome = Ok(());
    if path.exists() {
        fs::remove_file(path).map_err(|e| StrataError::io(OperationKind::Delete.as_str(), path, e))?;
        outcome = format.on_post_delete(file);
    }

    file.memory().write().clear();
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::file::{ConfigMeta, EmbeddedBundle, shared};
    use crate::memory::MapMemory;
    use crate::operation::{CrudOperations, LifecycleHooks};
    use crate::value::Value;

    #[derive(Default)]
    struct Probe {
        bundle: EmbeddedBundle,
        post_create: AtomicUsize,
        post_delete: AtomicUsize,
        fail_pre_create: bool,
        fail_pre_delete: bool,
        fail_post_create: bool,
        fail_post_delete: bool,
    }

    impl LifecycleHooks for Probe {
        fn on_pre_create(&self, _file: &ConfigFile) -> Result<()> {
            if self.fail_pre_create {
                return Err(StrataError::hook("on_pre_create", "vetoed"));
            }
            Ok(())
        }

        fn on_pre_delete(&self, _file: &ConfigFile) -> Result<()> {
            if self.fail_pre_delete {
                return Err(StrataError::hook("on_pre_delete", "vetoed"));
            }
            Ok(())
        }

        fn on_post_create(&self, _file: &ConfigFile) -> Result<()> {
            self.post_create.fetch_add(1, Ordering::SeqCst);
            if self.fail_post_create {
                return Err(StrataError::hook("on_post_create", "listener exploded"));
            }
            Ok(())
        }

        fn on_post_delete(&self, _file: &ConfigFile) -> Result<()> {
            self.post_delete.fetch_add(1, Ordering::SeqCst);
            if self.fail_post_delete {
                return Err(StrataError::hook("on_post_delete", "listener exploded"));
            }
            Ok(())
        }
    }

    impl ConfigFormat for Probe {
        fn read_into(&self, _file: &ConfigFile) -> Result<bool> {
            Ok(false)
        }

        fn write_from(&self, _file: &ConfigFile) -> Result<bool> {
            Ok(false)
        }

        fn bundle(&self) -> &dyn ResourceBundle {
            &self.bundle
        }
    }

    fn file_in(dir: &Path, relative: &str) -> ConfigFile {
        ConfigFile::new(
            ConfigMeta::new("probe", relative),
            dir.join(relative),
            shared(MapMemory::<str>::new()),
        )
    }

    #[test]
    fn create_makes_parents_and_empty_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe::default();
        let file = file_in(dir.path(), "nested/deeper/config.yml");

        probe.create().execute(&file).expect("create");
        assert!(file.exists());
        assert_eq!(fs::read_to_string(file.location()).expect("read"), "");
        assert_eq!(probe.post_create.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn create_copies_bundled_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe {
            bundle: EmbeddedBundle::new().with("config.yml", b"motd: hello\n"),
            ..Probe::default()
        };
        let file = file_in(dir.path(), "config.yml");
        probe.create().execute(&file).expect("create");
        assert_eq!(fs::read_to_string(file.location()).expect("read"), "motd: hello\n");
    }

    #[test]
    fn create_on_existing_file_is_a_silent_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe::default();
        let file = file_in(dir.path(), "config.yml");
        fs::write(file.location(), "keep: me\n").expect("seed");

        probe.create().execute(&file).expect("create");
        assert_eq!(fs::read_to_string(file.location()).expect("read"), "keep: me\n");
        assert_eq!(probe.post_create.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_post_create_does_not_fail_create() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe {
            fail_post_create: true,
            ..Probe::default()
        };
        let file = file_in(dir.path(), "config.yml");
        probe.create().execute(&file).expect("create still succeeds");
        assert!(file.exists());
    }

    #[test]
    fn delete_clears_memory_even_without_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe::default();
        let file = file_in(dir.path(), "config.yml");
        file.memory().write().set("a", Value::from(1));

        probe.delete().execute(&file).expect("delete");
        assert!(file.memory().read().is_empty());
        assert_eq!(probe.post_delete.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_post_delete_propagates_after_clearing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe {
            fail_post_delete: true,
            ..Probe::default()
        };
        let file = file_in(dir.path(), "config.yml");
        fs::write(file.location(), "a: 1\n").expect("seed");
        file.memory().write().set("a", Value::from(1));

        let err = probe.delete().execute(&file).expect_err("hook failure");
        assert!(matches!(err, StrataError::Hook { hook: "on_post_delete", .. }));
        assert!(!file.exists());
        assert!(file.memory().read().is_empty());
    }

    #[test]
    fn failing_pre_create_aborts_before_touching_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe {
            fail_pre_create: true,
            ..Probe::default()
        };
        let file = file_in(dir.path(), "nested/config.yml");

        let err = probe.create().execute(&file).expect_err("vetoed");
        assert!(matches!(err, StrataError::Hook { hook: "on_pre_create", .. }));
        assert!(!file.exists());
        assert!(!dir.path().join("nested").exists());
        assert_eq!(probe.post_create.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_pre_delete_keeps_file_and_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = Probe {
            fail_pre_delete: true,
            ..Probe::default()
        };
        let file = file_in(dir.path(), "config.yml");
        fs::write(file.location(), "a: 1\n").expect("seed");
        file.memory().write().set("a", Value::from(1));

        let err = probe.delete().execute(&file).expect_err("vetoed");
        assert!(matches!(err, StrataError::Hook { hook: "on_pre_delete", .. }));
        assert!(file.exists());
        assert_eq!(file.memory().read().get_int("a", 0), 1);
        assert_eq!(probe.post_delete.load(Ordering::SeqCst), 0);
    }
}
