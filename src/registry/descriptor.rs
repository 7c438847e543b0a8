//! TypeDescriptor — the explicit declared mapping registered for a type.
//!
//! A descriptor states, once, everything the registry needs: the declared
//! attributes (name → kind), the backing storage-field names, the explicit
//! skip markers, the parent descriptor for effective-map merging, and a
//! constructor used to rebuild instances from an archive. Descriptors are
//! built in a `OnceLock` inside `Described::type_descriptor` and live for
//! the process.

use std::any::TypeId;

use crate::coder::Codable;
use crate::model::ValueKind;

/// Declared mapping for one concrete type. Never mutated after `build()`.
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    parent: Option<fn() -> &'static TypeDescriptor>,
    construct: fn() -> Box<dyn Codable>,
    attributes: Vec<(&'static str, ValueKind)>,
    storage_fields: Vec<&'static str>,
    skipped: Vec<&'static str>,
}

impl TypeDescriptor {
    /// Start declaring a type. The constructor comes from `Default`.
    pub fn builder<T>(name: &'static str) -> TypeDescriptorBuilder
    where
        T: Codable + Default + 'static,
    {
        TypeDescriptorBuilder {
            name,
            type_id: TypeId::of::<T>(),
            parent: None,
            construct: || Box::new(T::default()),
            attributes: Vec::new(),
            storage_fields: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn parent(&self) -> Option<&'static TypeDescriptor> {
        self.parent.map(|f| f())
    }

    /// Build a fresh default instance of the described type.
    pub fn construct(&self) -> Box<dyn Codable> {
        (self.construct)()
    }

    /// Declared attributes, in declaration order.
    pub fn attributes(&self) -> &[(&'static str, ValueKind)] {
        &self.attributes
    }

    /// Declared storage-field names.
    pub fn storage_fields(&self) -> &[&'static str] {
        &self.storage_fields
    }

    /// Explicitly skipped attribute names.
    pub fn skipped(&self) -> &[&'static str] {
        &self.skipped
    }

    /// Whether `ancestor` appears in this descriptor's chain (inclusive).
    pub fn is_kind_of(&self, ancestor: &TypeDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(desc) = current {
            if desc.type_id == ancestor.type_id {
                return true;
            }
            current = desc.parent();
        }
        false
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("storage_fields", &self.storage_fields)
            .field("skipped", &self.skipped)
            .field("parent", &self.parent().map(|p| p.name))
            .finish()
    }
}

/// Fluent declaration of one type's mapping.
pub struct TypeDescriptorBuilder {
    name: &'static str,
    type_id: TypeId,
    parent: Option<fn() -> &'static TypeDescriptor>,
    construct: fn() -> Box<dyn Codable>,
    attributes: Vec<(&'static str, ValueKind)>,
    storage_fields: Vec<&'static str>,
    skipped: Vec<&'static str>,
}

impl TypeDescriptorBuilder {
    /// Declare the parent type for effective-map merging.
    pub fn parent(mut self, parent: fn() -> &'static TypeDescriptor) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Replace the `Default`-based constructor.
    pub fn constructor(mut self, construct: fn() -> Box<dyn Codable>) -> Self {
        self.construct = construct;
        self
    }

    /// Declare an attribute (accessor) with its kind.
    pub fn attribute(mut self, name: &'static str, kind: ValueKind) -> Self {
        self.attributes.push((name, kind));
        self
    }

    /// Declare a backing storage field.
    pub fn storage_field(mut self, name: &'static str) -> Self {
        self.storage_fields.push(name);
        self
    }

    /// Declare several backing storage fields at once.
    pub fn storage_fields(mut self, names: &[&'static str]) -> Self {
        self.storage_fields.extend_from_slice(names);
        self
    }

    /// Explicitly exclude an attribute from coding.
    pub fn skip(mut self, name: &'static str) -> Self {
        self.skipped.push(name);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name,
            type_id: self.type_id,
            parent: self.parent,
            construct: self.construct,
            attributes: self.attributes,
            storage_fields: self.storage_fields,
            skipped: self.skipped,
        }
    }
}
