//! Concurrent, type-erased codec storage.
//!
//! Codecs are keyed by [`TypeId`]. Rust has no subtyping, so "supertype"
//! relations are declared explicitly with [`CodecRegistry::declare_supertype`]
//! together with the conversions in both directions. Every type has at most
//! one declared parent; resolution walks that chain and the closest ancestor
//! with a codec wins.

use std::any::{Any, TypeId, type_name};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::Codec;
use crate::error::CodecError;
use crate::value::NestedMap;

type ErasedSerialize = dyn Fn(&dyn Any) -> Result<NestedMap, CodecError> + Send + Sync;
type ErasedDeserialize = dyn Fn(&NestedMap) -> Result<Box<dyn Any>, CodecError> + Send + Sync;
type Upcast = dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync;
type Downcast = dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync;

struct ErasedCodec {
    type_name: &'static str,
    serialize: Arc<ErasedSerialize>,
    deserialize: Arc<ErasedDeserialize>,
}

struct SupertypeEdge {
    parent: TypeId,
    parent_name: &'static str,
    upcast: Arc<Upcast>,
    downcast: Arc<Downcast>,
}

/// Which codec a lookup resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecMatch {
    /// Type the codec was registered for.
    pub type_name: &'static str,
    /// Number of supertype hops from the requested type (`0` = exact).
    pub distance: usize,
}

/// Type → codec map, safe to share between threads.
#[derive(Default)]
pub struct CodecRegistry {
    codecs: DashMap<TypeId, Arc<ErasedCodec>>,
    parents: DashMap<TypeId, Arc<SupertypeEdge>>,
}

impl CodecRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `codec` for `T`, replacing any earlier codec for exactly `T`.
    pub fn register<T: 'static>(&self, codec: Codec<T>) {
        let ser = codec.clone();
        let serialize: Arc<ErasedSerialize> = Arc::new(move |entity: &dyn Any| {
            entity.downcast_ref::<T>().map_or_else(
                || Err(format!("codec for {} received another type", type_name::<T>()).into()),
                |entity| ser.serialize(entity),
            )
        });
        let deserialize: Arc<ErasedDeserialize> = Arc::new(move |section: &NestedMap| {
            codec
                .deserialize(section)
                .map(|entity| Box::new(entity) as Box<dyn Any>)
        });

        let previous = self.codecs.insert(
            TypeId::of::<T>(),
            Arc::new(ErasedCodec {
                type_name: type_name::<T>(),
                serialize,
                deserialize,
            }),
        );
        if previous.is_some() {
            debug!(entity = type_name::<T>(), "Replaced registered codec");
        }
    }

    /// Declare `B` as the supertype of `D`.
    ///
    /// `upcast` turns a `D` into the `B` the ancestor codec can write;
    /// `downcast` narrows a loaded `B` back into a `D`, or `None` when that
    /// is impossible. Redeclaring replaces the previous parent of `D`.
    pub fn declare_supertype<D, B, U, N>(&self, upcast: U, downcast: N)
    where
        D: 'static,
        B: 'static,
        U: Fn(&D) -> B + Send + Sync + 'static,
        N: Fn(B) -> Option<D> + Send + Sync + 'static,
    {
        let upcast: Arc<Upcast> = Arc::new(move |entity: &dyn Any| {
            entity
                .downcast_ref::<D>()
                .map(|derived| Box::new(upcast(derived)) as Box<dyn Any>)
        });
        let downcast: Arc<Downcast> = Arc::new(move |entity: Box<dyn Any>| {
            entity
                .downcast::<B>()
                .ok()
                .and_then(|base| downcast(*base))
                .map(|derived| Box::new(derived) as Box<dyn Any>)
        });
        self.parents.insert(
            TypeId::of::<D>(),
            Arc::new(SupertypeEdge {
                parent: TypeId::of::<B>(),
                parent_name: type_name::<B>(),
                upcast,
                downcast,
            }),
        );
    }

    /// Whether a codec is registered for exactly `T`.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered codecs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether no codec is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Resolve the codec used for `T`: exact first, then the nearest ancestor.
    #[must_use]
    pub fn find_codec<T: 'static>(&self) -> Option<CodecMatch> {
        let (codec, chain) = self.resolve(TypeId::of::<T>())?;
        Some(CodecMatch {
            type_name: codec.type_name,
            distance: chain.len(),
        })
    }

    /// Serialize `entity` with the resolved codec. `None` on a codec miss.
    pub fn serialize<T: 'static>(&self, entity: &T) -> Option<Result<NestedMap, CodecError>> {
        let (codec, chain) = self.resolve(TypeId::of::<T>())?;
        let mut owned: Option<Box<dyn Any>> = None;
        for edge in &chain {
            let current: &dyn Any = owned.as_deref().unwrap_or(entity);
            let Some(lifted) = (edge.upcast)(current) else {
                return Some(Err(format!("could not convert to {}", edge.parent_name).into()));
            };
            owned = Some(lifted);
        }
        let current: &dyn Any = owned.as_deref().unwrap_or(entity);
        Some((codec.serialize)(current))
    }

    /// Deserialize a `T` with the resolved codec. `None` on a codec miss.
    pub fn deserialize<T: 'static>(&self, section: &NestedMap) -> Option<Result<T, CodecError>> {
        let (codec, chain) = self.resolve(TypeId::of::<T>())?;
        let result = (codec.deserialize)(section).and_then(|mut entity| {
            for edge in chain.iter().rev() {
                entity = (edge.downcast)(entity).ok_or_else(|| -> CodecError {
                    format!("a loaded {} cannot be narrowed", edge.parent_name).into()
                })?;
            }
            entity
                .downcast::<T>()
                .map(|entity| *entity)
                .map_err(|_| format!("codec did not produce a {}", type_name::<T>()).into())
        });
        Some(result)
    }

    /// Walk the supertype chain from `start` until a codec is found.
    ///
    /// Returns the codec and the edges crossed, nearest first.
    fn resolve(&self, start: TypeId) -> Option<(Arc<ErasedCodec>, Vec<Arc<SupertypeEdge>>)> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start;
        loop {
            if let Some(codec) = self.codecs.get(&current) {
                return Some((Arc::clone(codec.value()), chain));
            }
            if !seen.insert(current) {
                return None;
            }
            let edge = self.parents.get(&current).map(|edge| Arc::clone(edge.value()))?;
            current = edge.parent;
            chain.push(edge);
        }
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.len())
            .field("supertypes", &self.parents.len())
            .finish()
    }
}
