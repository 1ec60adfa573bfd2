//! Lifecycle notifications.
//!
//! Formats publish a [`ConfigEvent`] to an [`EventSink`] when files are
//! created, deleted, loaded or saved. Only the publishing side lives here;
//! dispatching to listeners is up to the sink.

use std::fmt;
use std::sync::mpsc::Sender;

use parking_lot::Mutex;

use crate::error::{Result, StrataError};
use crate::file::ConfigFile;
use crate::memory::MemoryKey;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigEventKind {
    /// The file was created on disk.
    Created,
    /// The file was deleted and its memory cleared.
    Deleted,
    /// Content was loaded into memory.
    Loaded,
    /// Memory was written to disk.
    Saved,
}

impl fmt::Display for ConfigEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::Loaded => "loaded",
            Self::Saved => "saved",
        })
    }
}

/// A lifecycle event carrying the affected file.
pub struct ConfigEvent<K: MemoryKey + ?Sized = str> {
    kind: ConfigEventKind,
    file: ConfigFile<K>,
}

impl<K: MemoryKey + ?Sized> ConfigEvent<K> {
    /// New event.
    #[must_use]
    pub fn new(kind: ConfigEventKind, file: ConfigFile<K>) -> Self {
        Self { kind, file }
    }

    /// What happened.
    #[must_use]
    pub fn kind(&self) -> ConfigEventKind {
        self.kind
    }

    /// The affected file.
    #[must_use]
    pub fn file(&self) -> &ConfigFile<K> {
        &self.file
    }
}

impl<K: MemoryKey + ?Sized> Clone for ConfigEvent<K> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            file: self.file.clone(),
        }
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ConfigEvent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEvent")
            .field("kind", &self.kind)
            .field("file", &self.file.name())
            .finish()
    }
}

/// Receiver of lifecycle events.
pub trait EventSink<K: MemoryKey + ?Sized = str>: Send + Sync {
    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Delivery failures. Whether they abort the operation depends on the
    /// hook that published the event.
    fn publish(&self, event: &ConfigEvent<K>) -> Result<()>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl<K: MemoryKey + ?Sized> EventSink<K> for NoopSink {
    fn publish(&self, _event: &ConfigEvent<K>) -> Result<()> {
        Ok(())
    }
}

/// Forwards events over a channel to whoever drains the receiver.
pub struct ChannelSink<K: MemoryKey + ?Sized = str> {
    sender: Mutex<Sender<ConfigEvent<K>>>,
}

impl<K: MemoryKey + ?Sized> ChannelSink<K> {
    /// Sink feeding `sender`.
    #[must_use]
    pub fn new(sender: Sender<ConfigEvent<K>>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl<K> EventSink<K> for ChannelSink<K>
where
    K: MemoryKey + ?Sized,
    ConfigFile<K>: Send,
{
    fn publish(&self, event: &ConfigEvent<K>) -> Result<()> {
        self.sender
            .lock()
            .send(event.clone())
            .map_err(|_| StrataError::hook("publish", "event receiver disconnected"))
    }
}

impl<K: MemoryKey + ?Sized> fmt::Debug for ChannelSink<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSink").finish_non_exhaustive()
    }
}
