//! Keyed source reading archived objects.

use std::collections::BTreeMap;

use crate::coder::{Codable, Decoder};
use crate::model::Value;
use crate::registry::Registry;
use crate::{Error, Result};

use super::{decode_object, ArchiveEntry};

/// Reads one object's field map; nested objects are reconstructed through
/// the registry and their own generic decode.
///
/// Reads do not consume entries, so an override hook may inspect a key and
/// still decline it.
pub struct ArchiveDecoder<'r> {
    registry: &'r Registry,
    fields: BTreeMap<String, ArchiveEntry>,
}

impl<'r> ArchiveDecoder<'r> {
    pub(crate) fn new(registry: &'r Registry, fields: BTreeMap<String, ArchiveEntry>) -> Self {
        Self { registry, fields }
    }
}

impl Decoder for ArchiveDecoder<'_> {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        match self.fields.get(key) {
            Some(ArchiveEntry::Value(value)) => Ok(Some(value.clone())),
            Some(ArchiveEntry::Object(archived)) => Err(Error::TypeMismatch {
                expected: "value".to_owned(),
                got: format!("object <{}>", archived.class),
            }),
            None => Ok(None),
        }
    }

    fn get_object(&mut self, key: &str) -> Result<Option<Box<dyn Codable>>> {
        match self.fields.get(key) {
            Some(ArchiveEntry::Object(archived)) => {
                let instance = decode_object(archived.clone(), self.registry)?;
                Ok(Some(instance))
            }
            Some(ArchiveEntry::Value(value)) => Err(Error::TypeMismatch {
                expected: "object".to_owned(),
                got: value.kind_name().to_owned(),
            }),
            None => Ok(None),
        }
    }
}
