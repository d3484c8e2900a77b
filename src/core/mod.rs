//! # Core Wire Layer
//!
//! The dynamic value model and the MessagePack adapter beneath the object
//! codec.
//!
//! ## Components
//! - **Value**: owned scalars, collections, and embedded tagged objects
//! - **Adapter**: pack/unpack between values and MessagePack bytes, with
//!   extension-block dispatch for non-native values
//!
//! ## Wire Format
//! ```text
//! object      = tag field_value*          ; concatenated MessagePack values
//! tag         = positive integer < 2^32
//! field_value = any MessagePack value | ext_block
//! ext_block   = (code: 0x00..=0x7f, payload: bytes)
//! ```
//! The payload of an ext block written by the nested-object serializer
//! (code `0x00`) is itself a complete `object` sequence, which is what makes
//! the grammar recursive.

pub mod adapter;
pub mod value;
