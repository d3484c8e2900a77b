//! # Type Descriptors and Field Resolution
//!
//! Every serializable type carries a static [`TypeDescriptor`]: its wire
//! tag, the field names declared at that level, an optional parent
//! descriptor forming a single-inheritance chain, and a factory producing a
//! bare default-valued instance.
//!
//! Construction is two-phase: the factory builds the bare instance, the
//! decoder assigns every resolved field, then [`TaggedObject::initialize`]
//! runs, the same hook application code calls after normal construction, so
//! derived state is consistent between fresh and reconstructed instances and
//! constructor-only side effects never re-run on decode.

use std::any::Any;
use std::fmt;

use crate::core::value::Value;
use crate::error::Result;

/// Static description of a serializable type.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Type name, used in error messages and registration diagnostics.
    pub name: &'static str,
    /// Wire tag. Unique across all registered types for the process.
    pub tag: u32,
    /// Fields declared at this level only; ancestors contribute theirs via
    /// `parent`. May be empty.
    pub fields: &'static [&'static str],
    /// Parent descriptor, if this type extends another serializable type.
    pub parent: Option<&'static TypeDescriptor>,
    /// Factory for a bare instance, bypassing normal construction.
    pub make: fn() -> Box<dyn TaggedObject>,
}

impl TypeDescriptor {
    /// Flatten the ancestor chain into the serialized field list: each
    /// level's own fields, most ancestral first, de-duplicated keeping the
    /// first occurrence. A field redeclared by a descendant neither shifts
    /// position nor duplicates.
    pub fn resolved_fields(&self) -> Vec<&'static str> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(descriptor) = current {
            chain.push(descriptor);
            current = descriptor.parent;
        }

        let mut resolved = Vec::new();
        for descriptor in chain.iter().rev() {
            for &field in descriptor.fields {
                if !resolved.contains(&field) {
                    resolved.push(field);
                }
            }
        }
        resolved
    }
}

/// Factory helper for [`TypeDescriptor::make`].
pub fn make_boxed<T: TaggedObject + Default>() -> Box<dyn TaggedObject> {
    Box::new(T::default())
}

/// A value that serializes as `[tag, field_1, ..., field_n]` on the wire.
///
/// Implementations expose their state through named-field access so the
/// codec can read and write fields in resolved-list order without knowing
/// the concrete type.
pub trait TaggedObject: Any + fmt::Debug + Send {
    /// The static descriptor for this concrete type.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Current value of a declared field, or `None` if the field has never
    /// been assigned (encoding such a field is a `MissingField` error).
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Assign a declared field. Fails with `TypeMismatch` when the value's
    /// shape does not fit the field, or `UnknownField` for names outside
    /// the resolved list.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Post-construction hook, run after normal construction and after
    /// decode populates all fields. Default is a no-op.
    fn initialize(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn TaggedObject>;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn TaggedObject> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

impl dyn TaggedObject {
    /// Whether the object is an instance of `T`.
    pub fn is<T: TaggedObject>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the object as its concrete type.
    pub fn downcast_ref<T: TaggedObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Field-by-field equality: same tag, and every resolved field compares
/// equal (recursively, for nested objects).
pub fn objects_eq(a: &dyn TaggedObject, b: &dyn TaggedObject) -> bool {
    let descriptor = a.descriptor();
    if descriptor.tag != b.descriptor().tag {
        return false;
    }
    descriptor
        .resolved_fields()
        .iter()
        .all(|field| a.get_field(field) == b.get_field(field))
}
