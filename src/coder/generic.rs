//! Generic encode/decode and dictionary extraction.
//!
//! For every key of the instance's effective attribute map, in lexical
//! order, the coder first offers the key to the object's override hook and
//! only falls back to the generic path when the hook reports not-handled.
//! Soft failures (unsupported kinds on encode, accessor rejections on
//! decode) are recorded per key and the remaining keys still process; a
//! stored-kind mismatch on decode aborts the whole decode.

use tracing::warn;

use crate::access;
use crate::model::{DictionaryRepresentation, Value, ValueKind};
use crate::registry::Registry;
use crate::{Error, Result};

use super::{Codable, Decoder, Encoder};

// ============================================================================
// Reports
// ============================================================================

/// One per-key soft failure.
#[derive(Debug)]
pub struct KeyFailure {
    pub key: String,
    pub error: Error,
}

/// Soft failures collected by one encode or decode pass.
///
/// An `Ok(report)` with failures means the object round-tripped minus the
/// named keys; callers that need all-or-nothing check [`is_clean`].
///
/// [`is_clean`]: CodingReport::is_clean
#[derive(Debug, Default)]
pub struct CodingReport {
    pub failures: Vec<KeyFailure>,
}

impl CodingReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, key: &str, error: Error) {
        warn!(key, %error, "attribute skipped");
        self.failures.push(KeyFailure { key: key.to_owned(), error });
    }
}

// ============================================================================
// Encode
// ============================================================================

/// Encode every effective attribute of `object` into `sink`.
///
/// Errors only on sink failure or a failing override hook; per-key problems
/// land in the report.
pub fn encode(
    object: &dyn Codable,
    registry: &Registry,
    sink: &mut dyn Encoder,
) -> Result<CodingReport> {
    let attributes = registry.effective_attributes(object);
    let mut report = CodingReport::default();

    for (key, kind) in &attributes {
        if object.encode_key(key, sink)? {
            continue;
        }

        match kind {
            ValueKind::Object => match access::read_nested(object, key) {
                Some(nested) => sink.put_object(key, nested)?,
                None => report.record(
                    key,
                    Error::UnsupportedValueKind { key: key.clone(), kind: kind.name() },
                ),
            },
            _ => match access::read_attribute(object, key) {
                Some(value) if value.satisfies(*kind) => sink.put(key, value)?,
                Some(value) => report.record(
                    key,
                    Error::UnsupportedValueKind { key: key.clone(), kind: value.kind_name() },
                ),
                // Unreadable attribute: nothing to store, nothing to report.
                None => {}
            },
        }
    }

    Ok(report)
}

// ============================================================================
// Decode
// ============================================================================

/// Populate `object` in place from `source` (set-with-coder semantics).
///
/// May be called on a freshly constructed instance or re-applied to merge
/// several sources. A stored value whose kind disagrees with the declared
/// kind is fatal: partial state of the wrong shape must not escape. Accessor
/// rejections and absent keys degrade per key.
pub fn decode(
    object: &mut dyn Codable,
    registry: &Registry,
    source: &mut dyn Decoder,
) -> Result<CodingReport> {
    let attributes = registry.effective_attributes_of(object.descriptor());
    let mut report = CodingReport::default();

    for (key, kind) in &attributes {
        if object.decode_key(key, source)? {
            continue;
        }

        match kind {
            ValueKind::Object => match source.get_object(key)? {
                Some(nested) => {
                    if let Err(error) = access::write_nested(object, key, nested) {
                        report.record(key, error);
                    }
                }
                None => {}
            },
            _ => match source.get(key)? {
                Some(value) => {
                    if !value.satisfies(*kind) {
                        return Err(Error::TypeMismatch {
                            expected: kind.name().to_owned(),
                            got: value.kind_name().to_owned(),
                        });
                    }
                    if let Err(error) = access::write_attribute(object, key, value) {
                        report.record(key, error);
                    }
                }
                None => {}
            },
        }
    }

    Ok(report)
}

// ============================================================================
// Dictionary extraction
// ============================================================================

/// Snapshot every effective attribute by reading, never writing.
///
/// Purely accessor-driven: the encode override hooks are coder machinery and
/// are never consulted here. Unreadable keys surface as `Null`; nested
/// objects as their own dictionary.
pub fn dictionary_representation(
    object: &dyn Codable,
    registry: &Registry,
) -> DictionaryRepresentation {
    let attributes = registry.effective_attributes(object);
    let mut snapshot = DictionaryRepresentation::new();

    for (key, kind) in &attributes {
        let value = match kind {
            ValueKind::Object => access::read_nested(object, key)
                .map(|nested| Value::Map(dictionary_representation(nested, registry)))
                .unwrap_or(Value::Null),
            _ => access::read_attribute(object, key).unwrap_or(Value::Null),
        };
        snapshot.insert(key.clone(), value);
    }

    snapshot
}
