//! # tagwire
//!
//! Polymorphic tagged-object serialization over MessagePack.
//!
//! A small integer **tag** identifies each registered type on the wire; an
//! object serializes as its tag followed by every field in its **resolved
//! field list**: the flattened, order-stable, de-duplicated union of the
//! fields declared along its inheritance chain, most ancestral first. A
//! pluggable **extension serializer** mechanism lets one registered object
//! live inside another's field at arbitrary depth.
//!
//! ## Quick Start
//! ```ignore
//! use tagwire::{decode, encode, Registry, TypeDescriptor, Value};
//!
//! let registry = Registry::with_defaults();
//! registry.register(&SAMPLE_DESCRIPTOR)?;
//!
//! let bytes = encode(&Sample { foo: Some("Hello World!".into()) }, &registry)?;
//! let restored = decode(&bytes, &registry)?.expect("tag is registered");
//! ```
//!
//! ## Design
//! - Registration is explicit, once per type, typically at process
//!   bootstrap; duplicate tags fail immediately and loudly
//! - Decode of an unknown tag yields `Ok(None)`, never a panic; the caller
//!   owns the fallback
//! - Reconstruction bypasses normal construction: a bare instance is built,
//!   fields are assigned in resolved order, then the type's `initialize`
//!   hook runs, identically to the normal construction path
//! - Codec operations take `&Registry`; a process-wide default is available
//!   through [`object::registry::global`]

pub mod config;
pub mod core;
pub mod error;
pub mod object;

pub use crate::core::adapter;
pub use crate::core::value::Value;
pub use crate::error::{CodecError, Result};
pub use crate::object::codec::{decode, encode};
pub use crate::object::descriptor::{make_boxed, objects_eq, TaggedObject, TypeDescriptor};
pub use crate::object::ext::{ExtSerializer, NestedObjectSerializer};
pub use crate::object::registry::{global, RegisteredType, Registry};
