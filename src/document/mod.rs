//! Structured-document codec — plain hierarchical JSON, no type metadata.
//!
//! The human-readable side of the house: collection-like and plain values
//! are written as ordinary JSON and read back without any class or kind
//! tags. Lossy by design for the exotic kinds — a `Timestamp` becomes an
//! RFC 3339 string, `Bytes` a number array — because a document promises
//! readability, not identity.

use std::collections::BTreeMap;

use crate::model::Value;
use crate::Result;

/// Render `value` as pretty-printed plain JSON.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&to_json(value))?)
}

/// Parse plain JSON into a [`Value`].
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(from_json(json))
}

pub fn to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::Array(b.iter().map(|&byte| Json::from(byte)).collect()),
        Value::Timestamp(t) => Json::String(t.to_rfc3339()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => Json::Object(
            map.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
    }
}

pub fn from_json(json: serde_json::Value) -> Value {
    use serde_json::Value as Json;
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let value = Value::from(vec![
            ("name", Value::from("Ada")),
            ("scores", Value::from(vec![1i64, 2, 3])),
            ("active", Value::Bool(true)),
        ]);
        let bytes = to_bytes(&value).unwrap();
        let back = from_bytes(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_no_kind_tags_on_the_wire() {
        let bytes = to_bytes(&Value::Int(5)).unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap().trim(), "5");
    }

    #[test]
    fn test_non_json_is_an_error() {
        assert!(from_bytes(b"\x00\x01binary").is_err());
    }

    #[test]
    fn test_number_kinds() {
        assert_eq!(from_bytes(b"3").unwrap(), Value::Int(3));
        assert_eq!(from_bytes(b"3.5").unwrap(), Value::Float(3.5));
    }
}
