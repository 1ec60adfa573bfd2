//! Generic text-document format on top of a [`DocumentCodec`].
//!
//! [`DocumentSource`] implements the read and update halves of the
//! lifecycle for any codec that turns text into a nested document and back.
//! Concrete codecs (YAML, JSON, TOML) live in `strata-formats`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CodecError, Result, StrataError};
use crate::event::{ConfigEvent, ConfigEventKind, EventSink};
use crate::file::{ConfigFile, NoBundle, ResourceBundle};
use crate::operation::{ConfigFormat, LifecycleHooks, OperationKind};
use crate::structure::{flatten, unflatten_entries};
use crate::value::NestedMap;

/// Text ↔ nested document conversion for one file format.
pub trait DocumentCodec: Send + Sync {
    /// Short format name used in errors (`yaml`, `json`, ...).
    fn name(&self) -> &'static str;

    /// Preferred file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Parse `text` into a document.
    ///
    /// # Errors
    ///
    /// Syntax errors and unsupported shapes.
    fn decode(&self, text: &str) -> std::result::Result<NestedMap, CodecError>;

    /// Render `document` as text.
    ///
    /// # Errors
    ///
    /// Values the format cannot represent.
    fn encode(&self, document: &NestedMap) -> std::result::Result<String, CodecError>;
}

/// What `read` does with values already in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Clear memory, then load. Keys removed from the file disappear.
    #[default]
    Replace,
    /// Load over existing memory. Keys only in memory survive.
    Merge,
}

/// A [`ConfigFormat`] for text documents handled by codec `C`.
pub struct DocumentSource<C> {
    codec: C,
    events: Option<Arc<dyn EventSink>>,
    bundle: Arc<dyn ResourceBundle>,
    read_policy: ReadPolicy,
    auto_read: bool,
}

impl<C: DocumentCodec> DocumentSource<C> {
    /// Source with no events, no bundled defaults and [`ReadPolicy::Replace`].
    #[must_use]
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            events: None,
            bundle: Arc::new(NoBundle),
            read_policy: ReadPolicy::default(),
            auto_read: false,
        }
    }

    /// Publish lifecycle events to `sink`.
    #[must_use]
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Take default content for new files from `bundle`.
    #[must_use]
    pub fn with_bundle(mut self, bundle: impl ResourceBundle + 'static) -> Self {
        self.bundle = Arc::new(bundle);
        self
    }

    /// Change how `read` treats existing memory.
    #[must_use]
    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// Read a file right after creating it.
    #[must_use]
    pub fn auto_read(mut self, enabled: bool) -> Self {
        self.auto_read = enabled;
        self
    }

    /// The codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The active read policy.
    #[must_use]
    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    fn decode_at(&self, path: &Path, text: &str) -> Result<NestedMap> {
        self.codec.decode(text).map_err(|source| StrataError::Format {
            format: self.codec.name(),
            path: path.to_path_buf(),
            source,
        })
    }

    /// Current on-disk document, or an empty one when the file is absent,
    /// blank or unreadable.
    fn existing_document(&self, path: &Path) -> NestedMap {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %error, "Existing file unreadable; overwriting");
                }
                return NestedMap::new();
            }
        };
        if text.trim().is_empty() {
            return NestedMap::new();
        }
        self.decode_at(path, &text).unwrap_or_else(|error| {
            warn!(path = %path.display(), error = %error, "Existing content malformed; overwriting");
            NestedMap::new()
        })
    }

    fn publish(&self, kind: ConfigEventKind, file: &ConfigFile) -> Result<()> {
        match &self.events {
            Some(sink) => sink.publish(&ConfigEvent::new(kind, file.clone())),
            None => Ok(()),
        }
    }
}

impl<C: DocumentCodec> LifecycleHooks for DocumentSource<C> {
    fn on_post_create(&self, file: &ConfigFile) -> Result<()> {
        self.publish(ConfigEventKind::Created, file)?;
        if self.auto_read {
            self.read_into(file)?;
        }
        Ok(())
    }

    fn on_post_delete(&self, file: &ConfigFile) -> Result<()> {
        self.publish(ConfigEventKind::Deleted, file)
    }

    fn on_post_read(&self, file: &ConfigFile) -> Result<()> {
        self.publish(ConfigEventKind::Loaded, file)
    }

    fn on_post_update(&self, file: &ConfigFile) -> Result<()> {
        self.publish(ConfigEventKind::Saved, file)
    }
}

impl<C: DocumentCodec> ConfigFormat for DocumentSource<C> {
    fn read_into(&self, file: &ConfigFile) -> Result<bool> {
        let path = file.location();
        if !path.exists() {
            debug!(config = %file.name(), path = %path.display(), "Nothing to read");
            return Ok(false);
        }

        let text = fs::read_to_string(path)
            .map_err(|e| StrataError::io(OperationKind::Read.as_str(), path, e))?;
        if text.trim().is_empty() {
            debug!(config = %file.name(), path = %path.display(), "File is blank");
            return Ok(false);
        }
        let document = self.decode_at(path, &text)?;

        let mut memory = file.memory().write();
        if self.read_policy == ReadPolicy::Replace {
            memory.clear();
        }
        flatten("", &document, &mut *memory);
        info!(
            config = %file.name(),
            format = self.codec.name(),
            keys = memory.len(),
            "Loaded configuration"
        );
        Ok(true)
    }

    fn write_from(&self, file: &ConfigFile) -> Result<bool> {
        let entries = file.memory().read().entries();
        if entries.is_empty() {
            debug!(config = %file.name(), "Memory is empty; nothing to write");
            return Ok(false);
        }
        let snapshot = unflatten_entries(entries)?;

        let path = file.location();
        let mut document = self.existing_document(path);
        for (key, value) in snapshot {
            document.insert(key, value);
        }

        let text = self.codec.encode(&document).map_err(|source| StrataError::Format {
            format: self.codec.name(),
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StrataError::io(OperationKind::Update.as_str(), parent, e))?;
        }
        fs::write(path, text).map_err(|e| StrataError::io(OperationKind::Update.as_str(), path, e))?;

        info!(
            config = %file.name(),
            format = self.codec.name(),
            path = %path.display(),
            "Saved configuration"
        );
        Ok(true)
    }

    fn bundle(&self) -> &dyn ResourceBundle {
        self.bundle.as_ref()
    }
}

impl<C: DocumentCodec + fmt::Debug> fmt::Debug for DocumentSource<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSource")
            .field("codec", &self.codec)
            .field("read_policy", &self.read_policy)
            .field("auto_read", &self.auto_read)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::event::ChannelSink;
    use crate::file::{ConfigMeta, shared};
    use crate::memory::MapMemory;
    use crate::operation::CrudOperations;
    use crate::value::Value;

    /// `key=value` lines; values parsed as integers when possible.
    #[derive(Debug)]
    struct LinesCodec;

    impl DocumentCodec for LinesCodec {
        fn name(&self) -> &'static str {
            "lines"
        }

        fn extension(&self) -> &'static str {
            "txt"
        }

        fn decode(&self, text: &str) -> std::result::Result<NestedMap, CodecError> {
            let mut flat = Vec::new();
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                let (key, value) = line.split_once('=').ok_or("missing `=`")?;
                let value = value
                    .parse::<i64>()
                    .map_or_else(|_| Value::from(value), Value::Int);
                flat.push((key.to_owned(), value));
            }
            Ok(unflatten_entries(flat)?)
        }

        fn encode(&self, document: &NestedMap) -> std::result::Result<String, CodecError> {
            let flat = crate::structure::flatten_to_map("", document);
            Ok(flat
                .iter()
                .map(|(key, value)| format!("{key}={value}\n"))
                .collect())
        }
    }

    fn file_at(path: &Path) -> ConfigFile {
        ConfigFile::new(
            ConfigMeta::new("lines", "test.txt"),
            path.to_path_buf(),
            shared(MapMemory::<str>::new()),
        )
    }

    #[test]
    fn read_replaces_memory_by_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        fs::write(&path, "network.port=25565\n").expect("seed");
        let file = file_at(&path);
        file.memory().write().set("stale", Value::from(1));

        DocumentSource::new(LinesCodec).read().execute(&file).expect("read");
        let memory = file.memory().read();
        assert_eq!(memory.get_int("network.port", 0), 25565);
        assert!(!memory.contains("stale"));
    }

    #[test]
    fn merge_policy_keeps_existing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        fs::write(&path, "a=1\n").expect("seed");
        let file = file_at(&path);
        file.memory().write().set("b", Value::from(2));

        DocumentSource::new(LinesCodec)
            .with_read_policy(ReadPolicy::Merge)
            .read()
            .execute(&file)
            .expect("read");
        let memory = file.memory().read();
        assert_eq!(memory.get_int("a", 0), 1);
        assert_eq!(memory.get_int("b", 0), 2);
    }

    #[test]
    fn absent_and_blank_files_leave_memory_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        let file = file_at(&path);
        file.memory().write().set("kept", Value::from(true));
        let source = DocumentSource::new(LinesCodec);

        source.read().execute(&file).expect("absent");
        fs::write(&path, "  \n").expect("blank");
        source.read().execute(&file).expect("blank");
        assert!(file.memory().read().get_bool("kept", false));
    }

    #[test]
    fn malformed_content_is_a_format_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        fs::write(&path, "no separator here\n").expect("seed");
        let err = DocumentSource::new(LinesCodec)
            .read()
            .execute(&file_at(&path))
            .expect_err("malformed");
        assert!(matches!(err, StrataError::Format { format: "lines", .. }));
    }

    #[test]
    fn update_merges_over_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        fs::write(&path, "keep=1\nport=1\n").expect("seed");
        let file = file_at(&path);
        file.memory().write().set("port", Value::from(2));

        DocumentSource::new(LinesCodec).update().execute(&file).expect("update");
        assert_eq!(fs::read_to_string(&path).expect("read"), "keep=1\nport=2\n");
    }

    #[test]
    fn update_with_empty_memory_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        DocumentSource::new(LinesCodec)
            .update()
            .execute(&file_at(&path))
            .expect("update");
        assert!(!path.exists());
    }

    #[test]
    fn update_rejects_inconsistent_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = file_at(&dir.path().join("test.txt"));
        file.memory().write().set("a", Value::from(1));
        file.memory().write().set("a.b", Value::from(2));
        let err = DocumentSource::new(LinesCodec)
            .update()
            .execute(&file)
            .expect_err("collision");
        assert!(matches!(err, StrataError::KeyCollision { .. }));
    }

    #[test]
    fn hooks_publish_events_and_auto_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (tx, rx) = mpsc::channel::<ConfigEvent>();
        let source = DocumentSource::new(LinesCodec)
            .with_events(Arc::new(ChannelSink::new(tx)))
            .with_bundle(crate::file::EmbeddedBundle::new().with("test.txt", b"motd=hi\n"))
            .auto_read(true);
        let file = file_at(&dir.path().join("test.txt"));

        source.create().execute(&file).expect("create");
        assert_eq!(file.memory().read().get_string("motd").as_deref(), Some("hi"));
        source.delete().execute(&file).expect("delete");

        let kinds: Vec<ConfigEventKind> = rx.try_iter().map(|event| event.kind()).collect();
        assert_eq!(kinds, vec![ConfigEventKind::Created, ConfigEventKind::Deleted]);
    }

    #[test]
    fn read_then_update_keeps_key_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.txt");
        let original = "network.server-ip=10.0.0.1\nnetwork.max-players=20\nnetwork.port=1\nmotd=hi\n";
        fs::write(&path, original).expect("seed");
        let file = file_at(&path);
        let source = DocumentSource::new(LinesCodec);

        source.read().execute(&file).expect("read");
        source.update().execute(&file).expect("update");
        assert_eq!(fs::read_to_string(&path).expect("written"), original);
    }
}
