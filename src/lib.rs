//! # codable-rs — Declarative Attribute Persistence
//!
//! Automatic save/restore for structured objects without per-attribute
//! serialization code: a type declares its attribute mapping once, and the
//! registry, generic coder and sniffing file I/O do the rest.
//!
//! ## Design Principles
//!
//! 1. **Declared, not discovered**: each type registers an explicit
//!    `TypeDescriptor` — attributes, storage fields, skip markers — built
//!    once and immutable afterwards
//! 2. **Registry drives the coder**: what gets encoded is exactly the
//!    cached attribute map; accessors only move values
//! 3. **Coders are traits**: `Encoder`/`Decoder` are keyed sinks/sources;
//!    the bundled archive codec is one implementation, not the contract
//! 4. **Content decides the format**: loading sniffs archived graph, then
//!    structured document, then raw bytes — never the file name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codable_rs::{Store, Stored, Value};
//! # use codable_rs::{Codable, Described, TypeDescriptor, ValueKind, AccessError};
//! # use std::sync::OnceLock;
//! # #[derive(Default)]
//! # struct Person { name: String }
//! # impl Described for Person {
//! #     fn type_descriptor() -> &'static TypeDescriptor {
//! #         static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
//! #         DESC.get_or_init(|| TypeDescriptor::builder::<Person>("Person")
//! #             .attribute("name", ValueKind::Text)
//! #             .storage_field("name")
//! #             .build())
//! #     }
//! # }
//! # impl Codable for Person {
//! #     fn descriptor(&self) -> &'static TypeDescriptor { Person::type_descriptor() }
//! #     fn get_attribute(&self, name: &str) -> Option<Value> {
//! #         (name == "name").then(|| Value::from(self.name.clone()))
//! #     }
//! #     fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
//! #         self.name = value.as_str().ok_or(AccessError::NoSuchAttribute)?.into();
//! #         Ok(())
//! #     }
//! # }
//!
//! # fn example() -> codable_rs::Result<()> {
//! let store = Store::new();
//! store.register::<Person>();
//!
//! // Archive an object, load it back typed.
//! let alice = Person { name: "Alice".into() };
//! store.write(&Stored::Object(Box::new(alice)), "alice.archive", true);
//! let alice: Person = store.load_as("alice.archive")?;
//!
//! // Or load anything: archives, plain documents, arbitrary bytes.
//! let whatever = store.load("mystery.bin")?;
//! println!("{:?}", whatever.format());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod registry;
pub mod access;
pub mod coder;
pub mod archive;
pub mod document;
pub mod io;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AttributeMap, DictionaryRepresentation, FileFormat, Stored, Value, ValueKind,
};

// ============================================================================
// Re-exports: Registry & coding surface
// ============================================================================

pub use registry::{Registry, TypeDescriptor, TypeDescriptorBuilder};
pub use access::AccessError;
pub use coder::{Codable, CodingReport, Decoder, Described, Encoder, KeyFailure};

// ============================================================================
// Top-level Store handle
// ============================================================================

use std::path::Path;

/// The primary entry point. A `Store` bundles a [`Registry`] with the
/// sniffing loader/writer and the generic coder.
pub struct Store {
    registry: Registry,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// A store with a fresh, empty registry.
    pub fn new() -> Self {
        Self { registry: Registry::new() }
    }

    /// A store over an already-populated registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Access the underlying registry (for advanced use).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register `T` so archives naming its class can be reconstructed.
    pub fn register<T: Described>(&self) {
        self.registry.register::<T>();
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Load anything: archived graph, structured document, or raw bytes.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Stored> {
        io::load_path(path, &self.registry)
    }

    /// Load a file whose root must be exactly `T`.
    pub fn load_as<T: Described + Codable>(&self, path: impl AsRef<Path>) -> Result<T> {
        io::load_path_as(path, &self.registry)
    }

    /// Write `stored`, picking the encoding from its kind. Boolean outcome;
    /// failures are logged.
    pub fn write(&self, stored: &Stored, path: impl AsRef<Path>, atomic: bool) -> bool {
        io::write(stored, path, &self.registry, atomic)
    }

    /// Fallible variant of [`write`](Store::write).
    pub fn try_write(&self, stored: &Stored, path: impl AsRef<Path>, atomic: bool) -> Result<()> {
        io::try_write(stored, path, &self.registry, atomic)
    }

    // ========================================================================
    // Bytes
    // ========================================================================

    /// Archive an object into wire bytes.
    pub fn encode_to_bytes(&self, object: &dyn Codable) -> Result<Vec<u8>> {
        archive::to_bytes(object, &self.registry)
    }

    /// Classify bytes through the sniffing chain.
    pub fn load_bytes(&self, bytes: Vec<u8>) -> Result<Stored> {
        io::load_bytes(bytes, &self.registry)
    }

    /// Decode archive bytes whose root must be exactly `T`.
    pub fn load_bytes_as<T: Described + Codable>(&self, bytes: Vec<u8>) -> Result<T> {
        io::load_bytes_as(bytes, &self.registry)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Dictionary snapshot of every effective attribute, read through the
    /// accessor bridge at call time.
    pub fn dictionary(&self, object: &dyn Codable) -> DictionaryRepresentation {
        coder::dictionary_representation(object, &self.registry)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reconstructed value's kind disagrees with the declared kind, or a
    /// typed load met a root of the wrong class. Fatal for that decode.
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Generic coding met a kind it cannot represent for this key.
    /// Per-key; carried in a [`CodingReport`], not fatal to the object.
    #[error("Unsupported value kind for key '{key}': {kind}")]
    UnsupportedValueKind { key: String, kind: &'static str },

    /// An accessor refused a write. Per-key; decode continues.
    #[error("Accessor rejected key '{key}': {reason}")]
    AccessorRejected { key: String, reason: String },

    /// An archive named a class the registry does not know.
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// Bytes that claimed to be an archive but are not one.
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
