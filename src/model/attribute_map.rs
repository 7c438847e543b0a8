//! AttributeMap — the codable-attribute set of a type, and the dictionary
//! snapshot built from one.

use std::collections::BTreeMap;

use super::{Value, ValueKind};

/// A map of attribute names to their declared kinds.
///
/// `BTreeMap` keeps iteration in stable lexical order, so a matching encode
/// and decode always visit keys identically.
pub type AttributeMap = BTreeMap<String, ValueKind>;

/// A snapshot of attribute name → current value, read through the accessor
/// bridge at the moment of the call. Never cached.
pub type DictionaryRepresentation = BTreeMap<String, Value>;
