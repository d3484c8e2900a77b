//! # Type and Extension Registry
//!
//! Process-wide table mapping wire tags to type descriptors and extension
//! codes to custom serializers. Registration is a check-then-insert behind a
//! write lock, so concurrent bootstrap from multiple threads stays safe;
//! lookups take the read lock and stay contention-free once registration has
//! settled.
//!
//! Codec operations take `&Registry` rather than reaching for global state,
//! so tests run against isolated registries with no cross-test leakage. A
//! process-wide default is still offered through [`global`] for applications
//! that want the convenience.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::config::{MAX_EXT_CODE, NESTED_OBJECT_CODE};
use crate::error::{CodecError, Result};
use crate::object::descriptor::{TaggedObject, TypeDescriptor};
use crate::object::ext::{ExtSerializer, NestedObjectSerializer};

/// A registry entry: everything the codec needs about one type, with the
/// field list resolved once at registration time.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub name: &'static str,
    pub tag: u32,
    /// Resolved field list, ancestor-to-descendant, de-duplicated.
    pub fields: Arc<[&'static str]>,
    pub make: fn() -> Box<dyn TaggedObject>,
}

struct Inner {
    types: HashMap<u32, RegisteredType>,
    /// Registration order is dispatch order; see the adapter module.
    serializers: Vec<(u8, Arc<dyn ExtSerializer>)>,
}

/// Tag→type and code→serializer tables.
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// An empty registry: no types, no serializers (not even the
    /// nested-object one; use [`Registry::with_defaults`] for that).
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                types: HashMap::new(),
                serializers: Vec::new(),
            }),
        }
    }

    /// A registry with the built-in nested-object serializer pre-installed
    /// at code [`NESTED_OBJECT_CODE`].
    pub fn with_defaults() -> Self {
        Self {
            inner: RwLock::new(Inner {
                types: HashMap::new(),
                serializers: vec![(
                    NESTED_OBJECT_CODE,
                    Arc::new(NestedObjectSerializer) as Arc<dyn ExtSerializer>,
                )],
            }),
        }
    }

    /// Bind a type's tag to its descriptor and cache its resolved field
    /// list. A tag, once bound, stays bound for the life of the registry.
    pub fn register(&self, descriptor: &'static TypeDescriptor) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| CodecError::LockPoisoned)?;

        if let Some(existing) = inner.types.get(&descriptor.tag) {
            return Err(CodecError::DuplicateTag {
                tag: descriptor.tag,
                existing: existing.name,
            });
        }

        let fields = descriptor.resolved_fields();
        debug!(
            tag = descriptor.tag,
            name = descriptor.name,
            ?fields,
            "registered type"
        );
        inner.types.insert(
            descriptor.tag,
            RegisteredType {
                name: descriptor.name,
                tag: descriptor.tag,
                fields: fields.into(),
                make: descriptor.make,
            },
        );
        Ok(())
    }

    /// Look up a tag. `Ok(None)` is the recoverable "unknown type" outcome
    /// the decode path relies on.
    pub fn lookup(&self, tag: u32) -> Result<Option<RegisteredType>> {
        let inner = self.inner.read().map_err(|_| CodecError::LockPoisoned)?;
        Ok(inner.types.get(&tag).cloned())
    }

    /// Bind an extension code to a custom serializer. Codes share the
    /// uniqueness rule of type tags but live in their own namespace.
    pub fn register_serializer(
        &self,
        code: u8,
        serializer: Arc<dyn ExtSerializer>,
    ) -> Result<()> {
        if code > MAX_EXT_CODE {
            return Err(CodecError::CodeOutOfRange(code));
        }

        let mut inner = self.inner.write().map_err(|_| CodecError::LockPoisoned)?;
        if inner.serializers.iter().any(|(bound, _)| *bound == code) {
            return Err(CodecError::DuplicateCode(code));
        }

        debug!(code, "registered extension serializer");
        inner.serializers.push((code, serializer));
        Ok(())
    }

    /// The serializer bound to `code`, if any.
    pub fn serializer(&self, code: u8) -> Result<Option<Arc<dyn ExtSerializer>>> {
        let inner = self.inner.read().map_err(|_| CodecError::LockPoisoned)?;
        Ok(inner
            .serializers
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, serializer)| Arc::clone(serializer)))
    }

    /// Snapshot of all serializers in dispatch (registration) order.
    pub fn serializers(&self) -> Result<Vec<(u8, Arc<dyn ExtSerializer>)>> {
        let inner = self.inner.read().map_err(|_| CodecError::LockPoisoned)?;
        Ok(inner.serializers.clone())
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Process-wide default registry, created on first use with the built-in
/// nested-object serializer installed.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::with_defaults)
}
