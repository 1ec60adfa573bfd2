//! # Strata Core Library
//!
//! Format-agnostic configuration data model: typed in-memory key/value
//! storage, a nested ↔ flat path transform, placeholder templating, codec
//! based entity mapping, and a create/read/update/delete lifecycle that
//! keeps memory and disk in sync.
//!
//! - [`memory`]: [`DataMemory`] and its map-backed stores
//! - [`structure`]: `flatten` / `unflatten` between documents and dot paths
//! - [`replacement`]: `%placeholder%` substitution
//! - [`mapper`]: codecs turning entities into sections and back
//! - [`file`]: the [`ConfigFile`] entity, its metadata, paths and defaults
//! - [`operation`]: lifecycle commands, hooks and executors
//! - [`source`]: a generic text document format over a [`DocumentCodec`]
//! - [`registry`], [`api`], [`event`]: registration and notifications
//!
//! ## Example
//!
//! ```
//! use strata_core::memory::{DataMemory, MapMemory};
//! use strata_core::replacement::Replacement;
//! use strata_core::structure::{flatten, unflatten_under_path};
//! use strata_core::value::{NestedMap, Value};
//!
//! let mut network = NestedMap::new();
//! network.insert("server-ip".into(), Value::from("10.0.0.1"));
//! network.insert("max-players".into(), Value::from(20));
//! let mut doc = NestedMap::new();
//! doc.insert("network".into(), Value::Map(network.clone()));
//! doc.insert("motd".into(), Value::from("Welcome %user%!"));
//!
//! let mut memory: MapMemory<str> = MapMemory::new();
//! flatten("", &doc, &mut memory);
//!
//! assert_eq!(memory.get_int("network.max-players", 0), 20);
//! assert_eq!(
//!     memory.get_string_with("motd", "", &[Replacement::new("user", "Ayla")]),
//!     "Welcome Ayla!"
//! );
//! assert_eq!(unflatten_under_path("network", &memory).expect("section"), network);
//! ```
//!
//! Every operation is synchronous. Only the lifecycle operations touch the
//! disk; everything else is in-process computation.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod error;
pub mod event;
pub mod file;
pub mod mapper;
pub mod memory;
pub mod operation;
pub mod registry;
pub mod replacement;
pub mod settings;
pub mod source;
pub mod structure;
pub mod value;

pub use api::ConfigApi;
pub use error::{Result, StrataError};
pub use event::{ConfigEvent, ConfigEventKind, EventSink};
pub use file::{ConfigFile, ConfigMeta, SharedMemory};
pub use mapper::{Codec, Mapper};
pub use memory::{DataMemory, MapMemory, MemoryEntry};
pub use operation::{CrudOperations, ExecutionContext, OperationExecutor};
pub use registry::ConfigRegistry;
pub use replacement::{PlaceholderProcessor, Replacement, ReplacementProcessor};
pub use settings::StrataSettings;
pub use source::{DocumentCodec, DocumentSource, ReadPolicy};
pub use value::{NestedMap, Value};
