//! # Object Layer
//!
//! Typed serialization on top of the core wire layer.
//!
//! ## Components
//! - **Descriptor**: static type metadata, inheritance chain, field resolver
//! - **Registry**: tag→type and code→serializer tables
//! - **Codec**: encode/decode of `[tag, field_1, ..., field_n]` sequences
//! - **Ext**: custom serializer plugins, including the built-in
//!   nested-object serializer

pub mod codec;
pub mod descriptor;
pub mod ext;
pub mod registry;

pub use codec::{decode, encode};
pub use descriptor::{make_boxed, objects_eq, TaggedObject, TypeDescriptor};
pub use ext::{ExtSerializer, NestedObjectSerializer};
pub use registry::{global, RegisteredType, Registry};
