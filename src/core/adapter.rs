//! # Binary Codec Adapter
//!
//! Bridges the dynamic [`Value`] model to MessagePack via `rmpv`. MessagePack
//! values are self-delimiting, so a serialized object is a plain
//! concatenation of packed values written through [`write_value`] and read
//! back one at a time through [`read_value`].
//!
//! Non-native values ([`Value::Object`]) are offered to the registry's
//! extension serializers in registration order; the first one to claim the
//! value wins and the adapter emits a MessagePack ext block carrying that
//! serializer's code. On the way back in, an ext block is resolved through
//! the serializer bound to its code; an unbound code is a hard
//! [`CodecError::UnknownExtension`], since the stream cannot be meaningfully
//! continued past an unresolvable value.

use std::io::{self, Read};

use bytes::Bytes;
use rmp::Marker;
use tracing::trace;

use crate::config::MAX_NESTING_DEPTH;
use crate::core::value::Value;
use crate::error::{CodecError, Result};
use crate::object::registry::Registry;

/// Pack a single value to bytes.
pub fn pack(value: &Value, registry: &Registry) -> Result<Bytes> {
    let mut buf = Vec::new();
    write_value(&mut buf, value, registry)?;
    Ok(buf.into())
}

/// Unpack a single value from the front of `data`. Trailing bytes are
/// ignored; callers that expect several values use [`read_value`] directly.
pub fn unpack(data: &[u8], registry: &Registry) -> Result<Value> {
    let mut rd = data;
    read_value(&mut rd, registry)
}

/// Write one packed value to `wr`.
pub fn write_value<W: io::Write>(wr: &mut W, value: &Value, registry: &Registry) -> Result<()> {
    let wire = to_wire(value, registry)?;
    rmpv::encode::write_value(wr, &wire).map_err(|e| CodecError::EncodeError(e.to_string()))
}

/// Read one packed value from `rd`, resolving ext blocks through the
/// registry's serializers. Container nesting is capped at
/// [`MAX_NESTING_DEPTH`]; deeper streams fail with a decode error.
pub fn read_value<R: io::Read>(rd: &mut R, registry: &Registry) -> Result<Value> {
    let wire = read_wire(rd, 0)?;
    from_wire(wire, registry)
}

fn to_wire(value: &Value, registry: &Registry) -> Result<rmpv::Value> {
    Ok(match value {
        Value::Nil => rmpv::Value::Nil,
        Value::Bool(b) => rmpv::Value::Boolean(*b),
        Value::Int(i) => rmpv::Value::Integer((*i).into()),
        Value::UInt(u) => rmpv::Value::Integer((*u).into()),
        Value::F32(f) => rmpv::Value::F32(*f),
        Value::F64(f) => rmpv::Value::F64(*f),
        Value::Str(s) => rmpv::Value::String(s.as_str().into()),
        Value::Bin(b) => rmpv::Value::Binary(b.to_vec()),
        Value::Array(items) => rmpv::Value::Array(
            items
                .iter()
                .map(|item| to_wire(item, registry))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(pairs) => rmpv::Value::Map(
            pairs
                .iter()
                .map(|(k, v)| Ok((to_wire(k, registry)?, to_wire(v, registry)?)))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(_) => {
            let (code, payload) = dispatch_serialize(value, registry)?;
            rmpv::Value::Ext(code as i8, payload.to_vec())
        }
    })
}

fn from_wire(wire: rmpv::Value, registry: &Registry) -> Result<Value> {
    Ok(match wire {
        rmpv::Value::Nil => Value::Nil,
        rmpv::Value::Boolean(b) => Value::Bool(b),
        rmpv::Value::Integer(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                return Err(CodecError::DecodeError(format!(
                    "integer out of representable range: {n}"
                )));
            }
        }
        rmpv::Value::F32(f) => Value::F32(f),
        rmpv::Value::F64(f) => Value::F64(f),
        rmpv::Value::String(s) => Value::Str(
            s.into_str()
                .ok_or_else(|| CodecError::DecodeError("string is not valid UTF-8".into()))?,
        ),
        rmpv::Value::Binary(b) => Value::Bin(Bytes::from(b)),
        rmpv::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| from_wire(item, registry))
                .collect::<Result<Vec<_>>>()?,
        ),
        rmpv::Value::Map(pairs) => Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| Ok((from_wire(k, registry)?, from_wire(v, registry)?)))
                .collect::<Result<Vec<_>>>()?,
        ),
        rmpv::Value::Ext(code, data) => {
            // Negative codes are reserved by MessagePack itself.
            let code = u8::try_from(code).map_err(|_| {
                CodecError::DecodeError(format!("reserved extension code {code}"))
            })?;
            dispatch_deserialize(code, &data, registry)?
        }
    })
}

/// Marker-by-marker reader for one MessagePack value. `rmpv`'s own
/// `read_value` recurses once per container level with no bound, so a short
/// run of array or map headers from an untrusted peer would exhaust the
/// stack. This walks the same grammar itself and refuses containers nested
/// deeper than [`MAX_NESTING_DEPTH`], matching the cap already applied to
/// ext-block payloads.
fn read_wire<R: io::Read>(rd: &mut R, depth: usize) -> Result<rmpv::Value> {
    Ok(match Marker::from_u8(read_byte(rd)?) {
        Marker::Null => rmpv::Value::Nil,
        Marker::True => rmpv::Value::Boolean(true),
        Marker::False => rmpv::Value::Boolean(false),
        Marker::FixPos(n) => rmpv::Value::from(n),
        Marker::FixNeg(n) => rmpv::Value::from(n),
        Marker::U8 => rmpv::Value::from(read_byte(rd)?),
        Marker::U16 => rmpv::Value::from(u16::from_be_bytes(read_array(rd)?)),
        Marker::U32 => rmpv::Value::from(u32::from_be_bytes(read_array(rd)?)),
        Marker::U64 => rmpv::Value::from(u64::from_be_bytes(read_array(rd)?)),
        Marker::I8 => rmpv::Value::from(read_byte(rd)? as i8),
        Marker::I16 => rmpv::Value::from(i16::from_be_bytes(read_array(rd)?)),
        Marker::I32 => rmpv::Value::from(i32::from_be_bytes(read_array(rd)?)),
        Marker::I64 => rmpv::Value::from(i64::from_be_bytes(read_array(rd)?)),
        Marker::F32 => rmpv::Value::F32(f32::from_be_bytes(read_array(rd)?)),
        Marker::F64 => rmpv::Value::F64(f64::from_be_bytes(read_array(rd)?)),
        Marker::FixStr(len) => read_wire_str(rd, len as usize)?,
        Marker::Str8 => {
            let len = read_byte(rd)? as usize;
            read_wire_str(rd, len)?
        }
        Marker::Str16 => {
            let len = u16::from_be_bytes(read_array(rd)?) as usize;
            read_wire_str(rd, len)?
        }
        Marker::Str32 => {
            let len = u32::from_be_bytes(read_array(rd)?) as usize;
            read_wire_str(rd, len)?
        }
        Marker::Bin8 => {
            let len = read_byte(rd)? as usize;
            rmpv::Value::Binary(read_payload(rd, len)?)
        }
        Marker::Bin16 => {
            let len = u16::from_be_bytes(read_array(rd)?) as usize;
            rmpv::Value::Binary(read_payload(rd, len)?)
        }
        Marker::Bin32 => {
            let len = u32::from_be_bytes(read_array(rd)?) as usize;
            rmpv::Value::Binary(read_payload(rd, len)?)
        }
        Marker::FixArray(len) => read_wire_array(rd, len as usize, depth)?,
        Marker::Array16 => {
            let len = u16::from_be_bytes(read_array(rd)?) as usize;
            read_wire_array(rd, len, depth)?
        }
        Marker::Array32 => {
            let len = u32::from_be_bytes(read_array(rd)?) as usize;
            read_wire_array(rd, len, depth)?
        }
        Marker::FixMap(len) => read_wire_map(rd, len as usize, depth)?,
        Marker::Map16 => {
            let len = u16::from_be_bytes(read_array(rd)?) as usize;
            read_wire_map(rd, len, depth)?
        }
        Marker::Map32 => {
            let len = u32::from_be_bytes(read_array(rd)?) as usize;
            read_wire_map(rd, len, depth)?
        }
        Marker::FixExt1 => read_wire_ext(rd, 1)?,
        Marker::FixExt2 => read_wire_ext(rd, 2)?,
        Marker::FixExt4 => read_wire_ext(rd, 4)?,
        Marker::FixExt8 => read_wire_ext(rd, 8)?,
        Marker::FixExt16 => read_wire_ext(rd, 16)?,
        Marker::Ext8 => {
            let len = read_byte(rd)? as usize;
            read_wire_ext(rd, len)?
        }
        Marker::Ext16 => {
            let len = u16::from_be_bytes(read_array(rd)?) as usize;
            read_wire_ext(rd, len)?
        }
        Marker::Ext32 => {
            let len = u32::from_be_bytes(read_array(rd)?) as usize;
            read_wire_ext(rd, len)?
        }
        Marker::Reserved => {
            return Err(CodecError::DecodeError("reserved marker 0xc1".into()))
        }
    })
}

fn enter_container(depth: usize) -> Result<usize> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(CodecError::DecodeError(format!(
            "container nesting exceeds {MAX_NESTING_DEPTH} levels"
        )));
    }
    Ok(depth + 1)
}

fn read_byte<R: io::Read>(rd: &mut R) -> Result<u8> {
    Ok(read_array::<R, 1>(rd)?[0])
}

fn read_array<R: io::Read, const N: usize>(rd: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    rd.read_exact(&mut buf)
        .map_err(|e| CodecError::DecodeError(e.to_string()))?;
    Ok(buf)
}

/// The length comes off the wire, so read what is actually there instead of
/// allocating the claimed size up front.
fn read_payload<R: io::Read>(rd: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    rd.take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| CodecError::DecodeError(e.to_string()))?;
    if buf.len() != len {
        return Err(CodecError::DecodeError(
            "unexpected end of input".into(),
        ));
    }
    Ok(buf)
}

fn read_wire_str<R: io::Read>(rd: &mut R, len: usize) -> Result<rmpv::Value> {
    let s = String::from_utf8(read_payload(rd, len)?)
        .map_err(|_| CodecError::DecodeError("string is not valid UTF-8".into()))?;
    Ok(rmpv::Value::String(s.into()))
}

fn read_wire_array<R: io::Read>(rd: &mut R, len: usize, depth: usize) -> Result<rmpv::Value> {
    let depth = enter_container(depth)?;
    let mut items = Vec::new();
    for _ in 0..len {
        items.push(read_wire(rd, depth)?);
    }
    Ok(rmpv::Value::Array(items))
}

fn read_wire_map<R: io::Read>(rd: &mut R, len: usize, depth: usize) -> Result<rmpv::Value> {
    let depth = enter_container(depth)?;
    let mut pairs = Vec::new();
    for _ in 0..len {
        let key = read_wire(rd, depth)?;
        let val = read_wire(rd, depth)?;
        pairs.push((key, val));
    }
    Ok(rmpv::Value::Map(pairs))
}

fn read_wire_ext<R: io::Read>(rd: &mut R, len: usize) -> Result<rmpv::Value> {
    let code = read_byte(rd)? as i8;
    Ok(rmpv::Value::Ext(code, read_payload(rd, len)?))
}

/// Offer a non-native value to each serializer in registration order; the
/// first claim wins. This order sensitivity is user-visible and deliberate:
/// it is the disambiguation rule when two serializers could both handle a
/// value.
fn dispatch_serialize(value: &Value, registry: &Registry) -> Result<(u8, Bytes)> {
    for (code, serializer) in registry.serializers()? {
        if let Some(payload) = serializer.try_serialize(value, registry)? {
            trace!(code, "extension serializer claimed value");
            return Ok((code, payload));
        }
    }
    Err(CodecError::UnsupportedValue(format!("{value:?}")))
}

fn dispatch_deserialize(code: u8, payload: &[u8], registry: &Registry) -> Result<Value> {
    let serializer = registry
        .serializer(code)?
        .ok_or(CodecError::UnknownExtension(code))?;
    serializer
        .try_deserialize(payload, registry)?
        .ok_or(CodecError::ExtensionRejected(code))
}
