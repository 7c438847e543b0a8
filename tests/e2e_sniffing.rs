//! Format-sniffing tests: the loader chain (archive → document → raw),
//! typed-load mismatches, and atomic-write behavior.

use std::sync::OnceLock;

use codable_rs::{
    AccessError, Codable, Described, Error, FileFormat, Store, Stored, TypeDescriptor, Value,
    ValueKind,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct Note {
    body: String,
}

impl Described for Note {
    fn type_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| {
            TypeDescriptor::builder::<Note>("Note")
                .attribute("body", ValueKind::Text)
                .storage_field("body")
                .build()
        })
    }
}

impl Codable for Note {
    fn descriptor(&self) -> &'static TypeDescriptor {
        Note::type_descriptor()
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        (name == "body").then(|| Value::from(self.body.clone()))
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        if name != "body" {
            return Err(AccessError::NoSuchAttribute);
        }
        self.body = value.as_str().ok_or(AccessError::NoSuchAttribute)?.to_owned();
        Ok(())
    }
}

#[derive(Default, Debug)]
struct Gadget {
    serial: i64,
}

impl Described for Gadget {
    fn type_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| {
            TypeDescriptor::builder::<Gadget>("Gadget")
                .attribute("serial", ValueKind::Int)
                .storage_field("serial")
                .build()
        })
    }
}

impl Codable for Gadget {
    fn descriptor(&self) -> &'static TypeDescriptor {
        Gadget::type_descriptor()
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        (name == "serial").then(|| Value::Int(self.serial))
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        if name != "serial" {
            return Err(AccessError::NoSuchAttribute);
        }
        self.serial = value.as_int().ok_or(AccessError::NoSuchAttribute)?;
        Ok(())
    }
}

fn store() -> Store {
    let store = Store::new();
    store.register::<Note>();
    store.register::<Gadget>();
    store
}

// ============================================================================
// The chain
// ============================================================================

#[test]
fn test_document_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let store = store();
    let value = Value::from(vec![
        ("theme", Value::from("dark")),
        ("columns", Value::from(vec![80i64, 120])),
    ]);

    assert!(store.write(&Stored::Document(value.clone()), &path, false));

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.format(), FileFormat::StructuredDocument);
    assert_eq!(loaded.as_document(), Some(&value));
}

#[test]
fn test_unrecognized_bytes_load_as_raw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blob.bin");

    let store = store();
    let noise: Vec<u8> = vec![0x00, 0xfe, 0x42, 0x13, 0x37];
    assert!(store.write(&Stored::Raw(noise.clone()), &path, false));

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.format(), FileFormat::RawBytes);
    assert_eq!(loaded.as_raw(), Some(noise.as_slice()));
}

#[test]
fn test_raw_is_a_fallback_never_an_error() {
    let store = store();
    // Looks vaguely like JSON, is not valid JSON, is not an archive.
    let loaded = store.load_bytes(b"{not json".to_vec()).unwrap();
    assert_eq!(loaded.format(), FileFormat::RawBytes);
}

#[test]
fn test_archive_with_unknown_class_degrades_to_document() {
    let fresh = Store::new(); // nothing registered
    let producer = store();

    let bytes = producer.encode_to_bytes(&Note { body: "hi".into() }).unwrap();
    let loaded = fresh.load_bytes(bytes).unwrap();

    // Still perfectly good JSON, so the chain yields a document instead of
    // failing the load outright.
    assert_eq!(loaded.format(), FileFormat::StructuredDocument);
}

#[test]
fn test_content_beats_extension() {
    let dir = tempfile::tempdir().unwrap();
    // Archive bytes behind a misleading name: sniffed as archive anyway.
    let path = dir.path().join("actually-an-archive.txt");

    let store = store();
    store.write(&Stored::Object(Box::new(Note { body: "x".into() })), &path, false);

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.format(), FileFormat::ArchivedGraph);
}

// ============================================================================
// Typed loads
// ============================================================================

#[test]
fn test_typed_load_wrong_class_is_a_mismatch() {
    let store = store();
    let bytes = store.encode_to_bytes(&Note { body: "hello".into() }).unwrap();

    let err = store.load_bytes_as::<Gadget>(bytes).unwrap_err();
    match err {
        Error::TypeMismatch { expected, got } => {
            assert_eq!(expected, "Gadget");
            assert_eq!(got, "Note");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_typed_load_of_a_document_is_a_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");

    let store = store();
    store.write(&Stored::Document(Value::Int(5)), &path, false);

    assert!(matches!(
        store.load_as::<Note>(&path),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_stored_kind_conflict_inside_archive_is_fatal() {
    let store = store();

    // A structurally valid archive whose "serial" carries text.
    let bytes = br#"{
        "format": "codable.archive",
        "version": 1,
        "root": {
            "class": "Gadget",
            "fields": { "serial": { "kind": "text", "value": "not a number" } }
        }
    }"#
    .to_vec();

    assert!(matches!(
        store.load_bytes(bytes),
        Err(Error::TypeMismatch { .. })
    ));
}

// ============================================================================
// Atomic writes
// ============================================================================

#[test]
fn test_atomic_write_replaces_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = store();
    assert!(store.write(&Stored::Document(Value::Int(1)), &path, true));
    assert!(store.write(&Stored::Document(Value::Int(2)), &path, true));

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.as_document(), Some(&Value::Int(2)));

    // No temp droppings left next to the target.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "state.json")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn test_failed_write_reports_false_and_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("state.json");

    let store = store();
    assert!(!store.write(&Stored::Document(Value::Int(1)), &path, true));
    assert!(!path.exists());
}
