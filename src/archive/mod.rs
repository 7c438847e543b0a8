//! Archived-graph codec — the bundled implementation of the coder protocol.
//!
//! Wire form is JSON: a wrapper carrying a format marker and version, then
//! the root archived object. Each archived object names its class and maps
//! field names to kind-tagged values or further archived objects, so decode
//! can resolve classes through the [`Registry`] and drive the generic coder
//! without any out-of-band schema.
//!
//! Missing markers, version drift, unknown classes and malformed structure
//! are definite failures — the sniffing loader then advances to the next
//! codec in its chain.

mod encoder;
mod decoder;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coder::{self, Codable};
use crate::model::Value;
use crate::registry::Registry;
use crate::{Error, Result};

pub use encoder::ArchiveEncoder;
pub use decoder::ArchiveDecoder;

pub(crate) const FORMAT_MARKER: &str = "codable.archive";
pub(crate) const FORMAT_VERSION: u32 = 1;

// ============================================================================
// Wire structs
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveFile {
    format: String,
    version: u32,
    root: ArchivedObject,
}

/// One encoded object: class name + field map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ArchivedObject {
    pub(crate) class: String,
    pub(crate) fields: BTreeMap<String, ArchiveEntry>,
}

/// A field slot: either a tagged value or a nested object. Untagged on the
/// wire — the two shapes are disjoint (`class`/`fields` vs `kind`/`value`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ArchiveEntry {
    Object(ArchivedObject),
    Value(Value),
}

// ============================================================================
// Entry points
// ============================================================================

/// Archive `object` (and every nested object) into wire bytes.
pub fn to_bytes(object: &dyn Codable, registry: &Registry) -> Result<Vec<u8>> {
    let mut sink = ArchiveEncoder::new(registry);
    coder::encode(object, registry, &mut sink)?;
    let file = ArchiveFile {
        format: FORMAT_MARKER.to_owned(),
        version: FORMAT_VERSION,
        root: sink.into_object(object.descriptor().name()),
    };
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Reconstruct the root object from wire bytes.
///
/// Structural problems (not this format, wrong version, unknown root class)
/// come back as [`Error::MalformedArchive`] / [`Error::UnknownClass`]; a
/// kind conflict inside the graph is a [`Error::TypeMismatch`].
pub fn from_bytes(bytes: &[u8], registry: &Registry) -> Result<Box<dyn Codable>> {
    let file: ArchiveFile = serde_json::from_slice(bytes)
        .map_err(|e| Error::MalformedArchive(e.to_string()))?;

    if file.format != FORMAT_MARKER {
        return Err(Error::MalformedArchive(format!("unexpected marker '{}'", file.format)));
    }
    if file.version != FORMAT_VERSION {
        return Err(Error::MalformedArchive(format!("unsupported version {}", file.version)));
    }

    decode_object(file.root, registry)
}

pub(crate) fn decode_object(
    archived: ArchivedObject,
    registry: &Registry,
) -> Result<Box<dyn Codable>> {
    let mut instance = registry.construct(&archived.class)?;
    let mut source = ArchiveDecoder::new(registry, archived.fields);
    coder::decode(instance.as_mut(), registry, &mut source)?;
    Ok(instance)
}
