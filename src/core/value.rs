//! # Dynamic Value Model
//!
//! Owned, self-describing values mirroring the MessagePack data model, plus
//! one non-native variant: [`Value::Object`], which holds a registered
//! tagged object. Objects are the only values the binary layer cannot pack
//! directly; they route through the extension-serializer dispatch instead.
//!
//! ## Numeric Normalization
//! MessagePack does not distinguish `5u64` from `5i64` on the wire, so any
//! unsigned value that fits in `i64` normalizes to [`Value::Int`] both at
//! construction and at decode. `Value::UInt` therefore only ever holds
//! magnitudes above `i64::MAX`, and round-tripped values compare equal.

use bytes::Bytes;

use crate::object::descriptor::{objects_eq, TaggedObject};

/// A value representable in the wire format.
#[derive(Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    /// Unsigned magnitudes above `i64::MAX` only; see module docs.
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Bytes),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order. Ordering is preserved exactly on
    /// a round trip.
    Map(Vec<(Value, Value)>),
    /// A registered tagged object, serialized as a nested extension block.
    Object(Box<dyn TaggedObject>),
}

impl Value {
    /// Wrap a tagged object as a field value.
    pub fn object<T: TaggedObject>(obj: T) -> Self {
        Value::Object(Box::new(obj))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Int(i) => u64::try_from(i).ok(),
            Value::UInt(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(f) => Some(f64::from(f)),
            Value::F64(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn TaggedObject> {
        match self {
            Value::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }

    /// Take ownership of the contained object, if any.
    pub fn into_object(self) -> Option<Box<dyn TaggedObject>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Nil => Value::Nil,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::UInt(u) => Value::UInt(*u),
            Value::F32(f) => Value::F32(*f),
            Value::F64(f) => Value::F64(*f),
            Value::Str(s) => Value::Str(s.clone()),
            Value::Bin(b) => Value::Bin(b.clone()),
            Value::Array(items) => Value::Array(items.clone()),
            Value::Map(pairs) => Value::Map(pairs.clone()),
            Value::Object(obj) => Value::Object(obj.boxed_clone()),
        }
    }
}

/// Structural equality. Objects compare by tag plus every resolved field,
/// recursively, so a decoded instance equals the instance it was encoded
/// from whenever all its field values round-trip.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bin(a), Value::Bin(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => objects_eq(a.as_ref(), b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                match i64::try_from(v) {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::UInt(v as u64),
                }
            }
        }
    )*};
}

from_unsigned!(u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bin(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bin(Bytes::from(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Nil,
        }
    }
}
