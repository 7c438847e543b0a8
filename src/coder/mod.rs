//! # Coder Protocol
//!
//! This is THE contract between the generic coder and any wire format.
//! An [`Encoder`] is a keyed sink, a [`Decoder`] a keyed source; both move
//! tagged [`Value`]s plus nested codable objects. The bundled `archive`
//! module implements the pair over a JSON wire form, but nothing in this
//! module knows (or cares) about bytes.
//!
//! [`Codable`] is the capability a type implements to participate:
//! a descriptor, attribute accessors, and two optional per-key override
//! hooks that default to "not handled".

pub mod generic;

use std::any::Any;

use crate::access::AccessError;
use crate::model::Value;
use crate::registry::TypeDescriptor;
use crate::Result;

pub use generic::{decode, dictionary_representation, encode, CodingReport, KeyFailure};

// ============================================================================
// Keyed sink / source
// ============================================================================

/// Keyed sink for generic encoding.
pub trait Encoder {
    /// Store a tagged value under `key`.
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    /// Store a nested codable object under `key`.
    ///
    /// Implementations recurse through the generic coder so the nested
    /// object's own overrides and attribute set apply.
    fn put_object(&mut self, key: &str, object: &dyn Codable) -> Result<()>;
}

/// Keyed source for generic decoding.
pub trait Decoder {
    /// Read the tagged value stored under `key`, `None` if absent.
    fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Reconstruct the nested object stored under `key`, `None` if absent.
    fn get_object(&mut self, key: &str) -> Result<Option<Box<dyn Codable>>>;
}

// ============================================================================
// Codable
// ============================================================================

/// Upcast-to-`Any` support, blanket-implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
    fn into_any(self: Box<Self>) -> Box<dyn Any> { self }
}

/// Static descriptor access for a concrete type.
///
/// The descriptor is the type's declared attribute mapping, built once and
/// leaked for the process lifetime. Implementations build it in a
/// `OnceLock` (see `TypeDescriptor::builder`).
pub trait Described {
    fn type_descriptor() -> &'static TypeDescriptor;
}

/// The capability a type implements to be generically encoded, decoded and
/// snapshotted.
///
/// `get_attribute`/`set_attribute` are the accessor surface the bridge reads
/// and writes through. The nested-object pair only matters for attributes
/// declared with `ValueKind::Object`; scalar-only types keep the defaults.
///
/// `encode_key`/`decode_key` are the per-key override hooks: return
/// `Ok(true)` to signal the key was fully handled and the generic path must
/// not touch it. The default handles nothing.
pub trait Codable: AsAny {
    /// The descriptor of this instance's concrete type.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Read one attribute. `None` means the accessor cannot produce a value
    /// for this name.
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Write one attribute. Rejections carry the accessor's own reason.
    fn set_attribute(&mut self, name: &str, value: Value) -> std::result::Result<(), AccessError>;

    /// Borrow a nested codable object attribute.
    fn get_nested(&self, _name: &str) -> Option<&dyn Codable> {
        None
    }

    /// Replace a nested codable object attribute.
    fn set_nested(
        &mut self,
        _name: &str,
        _object: Box<dyn Codable>,
    ) -> std::result::Result<(), AccessError> {
        Err(AccessError::NoSuchAttribute)
    }

    /// Override hook: encode `key` into `sink` manually.
    fn encode_key(&self, _key: &str, _sink: &mut dyn Encoder) -> Result<bool> {
        Ok(false)
    }

    /// Override hook: decode `key` from `source` manually.
    fn decode_key(&mut self, _key: &str, _source: &mut dyn Decoder) -> Result<bool> {
        Ok(false)
    }
}

impl dyn Codable {
    /// Downcast a boxed object to its concrete type.
    pub fn downcast<T: Codable>(self: Box<Self>) -> std::result::Result<Box<T>, Box<dyn Codable>> {
        // Probe through the unboxed trait object: resolving `as_any` on the
        // box itself would hit the blanket impl for `Box<dyn Codable>`.
        if self.downcast_ref::<T>().is_some() {
            Ok(self.into_any().downcast::<T>().expect("checked by downcast_ref"))
        } else {
            Err(self)
        }
    }

    pub fn downcast_ref<T: Codable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
