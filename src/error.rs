//! # Error Types
//!
//! Comprehensive error handling for the tagged-object codec.
//!
//! This module defines all error variants that can occur during registration,
//! encoding, and decoding, from low-level wire-format failures to
//! configuration mistakes caught at registry-population time.
//!
//! ## Error Categories
//! - **Configuration errors**: duplicate type tags, duplicate or out-of-range
//!   extension codes, raised synchronously at registration time
//! - **Encode errors**: unsupported values, missing fields, writer failures
//! - **Decode errors**: malformed streams, unknown extension codes, field
//!   shape mismatches
//!
//! An *unknown type tag* on decode is deliberately **not** an error: it is a
//! recoverable miss surfaced as `Ok(None)` from [`decode`], so callers decide
//! the fallback. All hard failures implement `std::error::Error`.
//!
//! [`decode`]: crate::object::codec::decode

use std::io;
use thiserror::Error;

/// Primary error type for all codec operations.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Type tag already bound; the message names the owning type so the
    /// offending registration is easy to locate.
    #[error("type tag {tag:#04x} already used by \"{existing}\"")]
    DuplicateTag { tag: u32, existing: &'static str },

    #[error("extension code {0:#04x} already in use")]
    DuplicateCode(u8),

    /// MessagePack reserves negative extension codes for itself, leaving
    /// applications the range `0..=127`.
    #[error("extension code {0:#04x} outside the application range 0x00..=0x7f")]
    CodeOutOfRange(u8),

    /// Encoding a type that was never registered would produce a stream no
    /// decoder can resolve, so it fails at the source.
    #[error("type \"{0}\" is not registered")]
    UnregisteredType(&'static str),

    #[error("no extension serializer registered for code {0:#04x}")]
    UnknownExtension(u8),

    #[error("extension serializer for code {0:#04x} rejected its payload")]
    ExtensionRejected(u8),

    #[error("no serializer claims value: {0}")]
    UnsupportedValue(String),

    #[error("field \"{field}\" of type \"{type_name}\" has no value")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("field \"{field}\" expects {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("type \"{type_name}\" has no field \"{field}\"")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    #[error("encode error: {0}")]
    EncodeError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("registry lock poisoned")]
    LockPoisoned,
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
