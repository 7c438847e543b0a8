//! Accessor bridge — reads and writes one attribute of a live object.
//!
//! The bridge is the only path between the generic coder (or dictionary
//! extraction) and an object's accessor surface. Reads return `Option`;
//! writes surface a descriptive [`crate::Error::AccessorRejected`] when the
//! target's own validation refuses the value. Partial application up to a
//! failing attribute is not rolled back (best-effort restore semantics).

use crate::coder::Codable;
use crate::model::Value;
use crate::{Error, Result};

/// Why an accessor refused a read or write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The object has no accessor for this name.
    #[error("no such attribute")]
    NoSuchAttribute,

    /// The accessor rejected the value.
    #[error("{0}")]
    Rejected(String),
}

impl AccessError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        AccessError::Rejected(reason.into())
    }
}

/// Read one attribute through the object's accessor.
pub fn read_attribute(object: &dyn Codable, name: &str) -> Option<Value> {
    object.get_attribute(name)
}

/// Write one attribute through the object's accessor.
///
/// Rejections come back as [`Error::AccessorRejected`] naming the key, so
/// callers can report and continue with the remaining keys.
pub fn write_attribute(object: &mut dyn Codable, name: &str, value: Value) -> Result<()> {
    object.set_attribute(name, value).map_err(|e| Error::AccessorRejected {
        key: name.to_owned(),
        reason: e.to_string(),
    })
}

/// Borrow a nested codable object attribute.
pub fn read_nested<'a>(object: &'a dyn Codable, name: &str) -> Option<&'a dyn Codable> {
    object.get_nested(name)
}

/// Replace a nested codable object attribute.
pub fn write_nested(
    object: &mut dyn Codable,
    name: &str,
    nested: Box<dyn Codable>,
) -> Result<()> {
    object.set_nested(name, nested).map_err(|e| Error::AccessorRejected {
        key: name.to_owned(),
        reason: e.to_string(),
    })
}
