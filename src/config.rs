//! # Wire Constants
//!
//! Centralized constants for the tagged-object wire format.
//!
//! These values are load-bearing for interoperability: any stream produced
//! with one set of constants is only decodable by a peer sharing the same
//! set, so they live in one place rather than scattered across modules.

/// Extension code reserved for the built-in nested-object serializer.
///
/// Payloads tagged with this code contain a complete serialized-object
/// sequence (`[tag, field_1, ..., field_n]`), enabling arbitrary nesting of
/// registered objects inside other registered objects' fields.
pub const NESTED_OBJECT_CODE: u8 = 0x00;

/// Highest extension code available to applications.
///
/// MessagePack reserves negative ext type codes for predefined extensions
/// (e.g. timestamps), leaving `0..=127` for application use.
pub const MAX_EXT_CODE: u8 = 0x7F;

/// Maximum object nesting depth accepted during decode.
///
/// Each nested-object ext block re-enters the decoder, and that recursion is
/// attacker-controlled: a few hundred bytes of chained ext headers would
/// otherwise overflow the stack. Legitimate object graphs stay far below
/// this.
pub const MAX_NESTING_DEPTH: usize = 128;
