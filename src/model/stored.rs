//! What a sniffing load yields and a write consumes.

use serde::{Deserialize, Serialize};

use crate::coder::Codable;
use super::Value;

/// On-disk representation, determined by content inspection at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// Coded object graph with class and kind tags.
    ArchivedGraph,
    /// Plain hierarchical data without type metadata.
    StructuredDocument,
    /// Uninterpreted bytes (fallback).
    RawBytes,
}

/// A loaded (or to-be-written) payload.
///
/// The writer chooses the encoding from the variant: objects become archived
/// graphs, documents become human-readable JSON, raw bytes are verbatim.
pub enum Stored {
    Object(Box<dyn Codable>),
    Document(Value),
    Raw(Vec<u8>),
}

impl Stored {
    pub fn format(&self) -> FileFormat {
        match self {
            Stored::Object(_) => FileFormat::ArchivedGraph,
            Stored::Document(_) => FileFormat::StructuredDocument,
            Stored::Raw(_) => FileFormat::RawBytes,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Codable> {
        match self {
            Stored::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Stored::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Stored::Raw(b) => Some(b),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Stored {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stored::Object(obj) => write!(f, "Object({})", obj.descriptor().name()),
            Stored::Document(v) => write!(f, "Document({v})"),
            Stored::Raw(b) => write!(f, "Raw({} bytes)", b.len()),
        }
    }
}

impl From<Value> for Stored {
    fn from(v: Value) -> Self { Stored::Document(v) }
}

impl From<Vec<u8>> for Stored {
    fn from(b: Vec<u8>) -> Self { Stored::Raw(b) }
}

impl From<Box<dyn Codable>> for Stored {
    fn from(obj: Box<dyn Codable>) -> Self { Stored::Object(obj) }
}
