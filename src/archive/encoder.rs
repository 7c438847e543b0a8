//! Keyed sink building archived objects.

use std::collections::BTreeMap;

use crate::coder::{self, Codable, Encoder};
use crate::model::Value;
use crate::registry::Registry;
use crate::Result;

use super::{ArchiveEntry, ArchivedObject};

/// Collects one object's fields; nested objects recurse through a child
/// encoder so their own attribute sets and overrides apply.
pub struct ArchiveEncoder<'r> {
    registry: &'r Registry,
    fields: BTreeMap<String, ArchiveEntry>,
}

impl<'r> ArchiveEncoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, fields: BTreeMap::new() }
    }

    pub(crate) fn into_object(self, class: &str) -> ArchivedObject {
        ArchivedObject { class: class.to_owned(), fields: self.fields }
    }
}

impl Encoder for ArchiveEncoder<'_> {
    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        self.fields.insert(key.to_owned(), ArchiveEntry::Value(value));
        Ok(())
    }

    fn put_object(&mut self, key: &str, object: &dyn Codable) -> Result<()> {
        let mut child = ArchiveEncoder::new(self.registry);
        coder::encode(object, self.registry, &mut child)?;
        let archived = child.into_object(object.descriptor().name());
        self.fields.insert(key.to_owned(), ArchiveEntry::Object(archived));
        Ok(())
    }
}
