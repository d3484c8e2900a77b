//! Shared sample types for the integration suites.
//!
//! Field values live in `Option`s so "never assigned" is representable and
//! the `MissingField` encode path is testable.

#![allow(dead_code)]

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};

use tagwire::{
    make_boxed, CodecError, Registry, Result, TaggedObject, TypeDescriptor, Value,
};

/// How many times a `Counter` went through normal construction. Decode must
/// never bump this.
pub static COUNTERS_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

// ---------------------------------------------------------------------------
// Sample: tag 0x00, fields ["foo"]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Sample {
    pub foo: Option<String>,
}

pub static SAMPLE: TypeDescriptor = TypeDescriptor {
    name: "Sample",
    tag: 0x00,
    fields: &["foo"],
    parent: None,
    make: make_boxed::<Sample>,
};

impl Sample {
    pub fn new(foo: &str) -> Self {
        Self {
            foo: Some(foo.to_owned()),
        }
    }
}

impl TaggedObject for Sample {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &SAMPLE
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "foo" => self.foo.clone().map(Value::from),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "foo" => match value {
                Value::Str(s) => self.foo = Some(s),
                _ => {
                    return Err(CodecError::TypeMismatch {
                        field: name.to_owned(),
                        expected: "a string",
                    })
                }
            },
            _ => {
                return Err(CodecError::UnknownField {
                    type_name: "Sample",
                    field: name.to_owned(),
                })
            }
        }
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Base: tag 0x01, fields ["a"] / Derived: tag 0x02, fields ["b"], extends Base
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Base {
    pub a: Option<i64>,
}

pub static BASE: TypeDescriptor = TypeDescriptor {
    name: "Base",
    tag: 0x01,
    fields: &["a"],
    parent: None,
    make: make_boxed::<Base>,
};

impl TaggedObject for Base {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &BASE
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "a" => self.a.map(Value::from),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "a" => {
                self.a = Some(value.as_i64().ok_or(CodecError::TypeMismatch {
                    field: name.to_owned(),
                    expected: "an integer",
                })?)
            }
            _ => {
                return Err(CodecError::UnknownField {
                    type_name: "Base",
                    field: name.to_owned(),
                })
            }
        }
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Derived {
    pub a: Option<i64>,
    pub b: Option<i64>,
}

pub static DERIVED: TypeDescriptor = TypeDescriptor {
    name: "Derived",
    tag: 0x02,
    fields: &["b"],
    parent: Some(&BASE),
    make: make_boxed::<Derived>,
};

impl TaggedObject for Derived {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &DERIVED
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "a" => self.a.map(Value::from),
            "b" => self.b.map(Value::from),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = match name {
            "a" => &mut self.a,
            "b" => &mut self.b,
            _ => {
                return Err(CodecError::UnknownField {
                    type_name: "Derived",
                    field: name.to_owned(),
                })
            }
        };
        *slot = Some(value.as_i64().ok_or(CodecError::TypeMismatch {
            field: name.to_owned(),
            expected: "an integer",
        })?);
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Envelope: tag 0x03, fields ["label", "inner"]; "inner" is a dynamic slot,
// typically holding another registered object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub label: Option<String>,
    pub inner: Option<Value>,
}

pub static ENVELOPE: TypeDescriptor = TypeDescriptor {
    name: "Envelope",
    tag: 0x03,
    fields: &["label", "inner"],
    parent: None,
    make: make_boxed::<Envelope>,
};

impl Envelope {
    pub fn wrap(label: &str, inner: Value) -> Self {
        Self {
            label: Some(label.to_owned()),
            inner: Some(inner),
        }
    }
}

impl TaggedObject for Envelope {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &ENVELOPE
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "label" => self.label.clone().map(Value::from),
            "inner" => self.inner.clone(),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "label" => match value {
                Value::Str(s) => self.label = Some(s),
                _ => {
                    return Err(CodecError::TypeMismatch {
                        field: name.to_owned(),
                        expected: "a string",
                    })
                }
            },
            "inner" => self.inner = Some(value),
            _ => {
                return Err(CodecError::UnknownField {
                    type_name: "Envelope",
                    field: name.to_owned(),
                })
            }
        }
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Counter: tag 0x04, fields ["count"]; `double` is derived in initialize()
// and never serialized
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Counter {
    pub count: Option<i64>,
    pub double: i64,
}

pub static COUNTER: TypeDescriptor = TypeDescriptor {
    name: "Counter",
    tag: 0x04,
    fields: &["count"],
    parent: None,
    make: make_boxed::<Counter>,
};

impl Counter {
    /// Normal application construction: records the side effect, then runs
    /// the same initialize hook the decode path runs.
    pub fn new(count: i64) -> Self {
        COUNTERS_CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        let mut counter = Self {
            count: Some(count),
            double: 0,
        };
        counter.initialize();
        counter
    }
}

impl TaggedObject for Counter {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &COUNTER
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "count" => self.count.map(Value::from),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "count" => {
                self.count = Some(value.as_i64().ok_or(CodecError::TypeMismatch {
                    field: name.to_owned(),
                    expected: "an integer",
                })?)
            }
            _ => {
                return Err(CodecError::UnknownField {
                    type_name: "Counter",
                    field: name.to_owned(),
                })
            }
        }
        Ok(())
    }

    fn initialize(&mut self) {
        self.double = self.count.unwrap_or(0) * 2;
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Bare: tag 0x05, no fields at all
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Bare;

pub static BARE: TypeDescriptor = TypeDescriptor {
    name: "Bare",
    tag: 0x05,
    fields: &[],
    parent: None,
    make: make_boxed::<Bare>,
};

impl TaggedObject for Bare {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &BARE
    }

    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(CodecError::UnknownField {
            type_name: "Bare",
            field: name.to_owned(),
        })
    }

    fn boxed_clone(&self) -> Box<dyn TaggedObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A registry with every sample type registered.
pub fn test_registry() -> Registry {
    let registry = Registry::with_defaults();
    for descriptor in [&SAMPLE, &BASE, &DERIVED, &ENVELOPE, &COUNTER, &BARE] {
        registry.register(descriptor).expect("fresh registry");
    }
    registry
}
