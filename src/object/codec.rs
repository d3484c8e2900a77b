//! # Object Codec
//!
//! Encodes a registered tagged object as its wire tag followed by every
//! resolved field value in order, and decodes that sequence back into a
//! bare instance populated field by field.
//!
//! Decode is deliberately forgiving about unknown tags: a stream whose
//! leading tag has no registered type yields `Ok(None)` so the caller picks
//! the fallback. Everything else (malformed bytes, unresolvable extension
//! codes, fields that do not fit) is a hard error, and no partial result
//! is ever returned.

use std::cell::Cell;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::config::MAX_NESTING_DEPTH;
use crate::core::adapter;
use crate::core::value::Value;
use crate::error::{CodecError, Result};
use crate::object::descriptor::TaggedObject;
use crate::object::registry::Registry;

thread_local! {
    static DECODE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Re-entrancy counter for nested-object decoding. The recursion depth is
/// wire-controlled, so it must be capped; see `MAX_NESTING_DEPTH`.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<Self> {
        DECODE_DEPTH.with(|depth| {
            if depth.get() >= MAX_NESTING_DEPTH {
                return Err(CodecError::DecodeError(format!(
                    "object nesting exceeds {MAX_NESTING_DEPTH} levels"
                )));
            }
            depth.set(depth.get() + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DECODE_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Encode an object as `[tag, field_1, ..., field_n]`.
///
/// Every field in the type's resolved list must have a value; a field whose
/// accessor returns `None` fails the whole encode with `MissingField` rather
/// than silently writing nil, since silent nulling masks programming errors.
pub fn encode(obj: &dyn TaggedObject, registry: &Registry) -> Result<Bytes> {
    let descriptor = obj.descriptor();
    let entry = registry
        .lookup(descriptor.tag)?
        .filter(|entry| entry.name == descriptor.name)
        .ok_or(CodecError::UnregisteredType(descriptor.name))?;

    let mut buf = Vec::new();
    adapter::write_value(&mut buf, &Value::from(descriptor.tag), registry)?;

    for &field in entry.fields.iter() {
        trace!(ty = entry.name, field, "encoding field");
        let value = obj
            .get_field(field)
            .ok_or(CodecError::MissingField {
                type_name: entry.name,
                field,
            })?;
        adapter::write_value(&mut buf, &value, registry)?;
    }

    Ok(buf.into())
}

/// Decode a serialized-object sequence.
///
/// Returns `Ok(None)` when the leading tag has no registered type.
/// Otherwise allocates a bare instance through the registered factory
/// (normal construction does not run), assigns each resolved field in
/// order, then runs the instance's `initialize` hook.
pub fn decode(data: &[u8], registry: &Registry) -> Result<Option<Box<dyn TaggedObject>>> {
    let _guard = DepthGuard::enter()?;
    let mut rd = data;

    let tag_value = adapter::read_value(&mut rd, registry)?;
    let tag = tag_value
        .as_u64()
        .and_then(|tag| u32::try_from(tag).ok())
        .ok_or_else(|| {
            CodecError::DecodeError(format!(
                "stream does not start with a type tag: {tag_value:?}"
            ))
        })?;

    let Some(entry) = registry.lookup(tag)? else {
        debug!(tag, "no type registered for tag, yielding nothing");
        return Ok(None);
    };

    let mut obj = (entry.make)();
    for &field in entry.fields.iter() {
        trace!(ty = entry.name, field, "decoding field");
        let value = adapter::read_value(&mut rd, registry)?;
        obj.set_field(field, value)?;
    }

    obj.initialize();
    Ok(Some(obj))
}
