//! # Custom Extension Serializers
//!
//! Open set of pluggable converters for values the binary layer cannot pack
//! natively. During encode the adapter offers such a value to every
//! registered serializer in registration order; `Ok(None)` means "not mine,
//! try the next one", while `Err` aborts the encode. During decode the
//! serializer bound to an ext block's code gets the payload.
//!
//! The one serializer the framework requires is [`NestedObjectSerializer`]:
//! it claims registered tagged objects and delegates to the object codec,
//! which is what lets one registered object live inside another's field at
//! arbitrary depth.

use bytes::Bytes;
use tracing::warn;

use crate::core::value::Value;
use crate::error::Result;
use crate::object::codec;
use crate::object::registry::Registry;

/// A pluggable converter bound to one extension code.
///
/// "Optional" return values signal refusal (the value or payload is not of
/// the handled kind), not failure; real failures use `Err`.
pub trait ExtSerializer: Send + Sync {
    /// Claim `value` and produce its payload bytes, or refuse with
    /// `Ok(None)`.
    fn try_serialize(&self, value: &Value, registry: &Registry) -> Result<Option<Bytes>>;

    /// Reconstruct a value from payload bytes, or refuse with `Ok(None)`.
    fn try_deserialize(&self, payload: &[u8], registry: &Registry) -> Result<Option<Value>>;
}

/// Serializes registered tagged objects as nested serialized-object
/// sequences, bound to code [`crate::config::NESTED_OBJECT_CODE`].
#[derive(Debug, Default)]
pub struct NestedObjectSerializer;

impl ExtSerializer for NestedObjectSerializer {
    fn try_serialize(&self, value: &Value, registry: &Registry) -> Result<Option<Bytes>> {
        match value {
            Value::Object(obj) => codec::encode(obj.as_ref(), registry).map(Some),
            _ => Ok(None),
        }
    }

    fn try_deserialize(&self, payload: &[u8], registry: &Registry) -> Result<Option<Value>> {
        match codec::decode(payload, registry)? {
            Some(obj) => Ok(Some(Value::Object(obj))),
            None => {
                // The ext block is length-delimited, so the outer stream
                // stays decodable; the unknown object degrades to nil.
                warn!("nested payload carries an unregistered type tag, decoding as nil");
                Ok(Some(Value::Nil))
            }
        }
    }
}
