//! Data model: values, kind tags, attribute maps, load/store payloads.

mod value;
mod attribute_map;
mod stored;

pub use value::{Value, ValueKind};
pub use attribute_map::{AttributeMap, DictionaryRepresentation};
pub use stored::{FileFormat, Stored};
