//! Attribute registry — per-type computation and caching of the codable
//! attribute set, plus the class-name table used to rebuild archived
//! objects.
//!
//! ## Matching rule
//!
//! An attribute declared on a descriptor is codable iff a declared storage
//! field is named identically, or identically with a leading underscore, and
//! the name carries no explicit skip marker. Read-only attributes follow the
//! same rule. A type with zero matches yields an empty map, not an error.
//!
//! ## Caching
//!
//! Per-type maps are computed lazily and cached for the process lifetime.
//! Types are immutable once registered, so there is no invalidation path.
//! Concurrent first-time computation is resolved first-insert-wins: the
//! value is a pure function of the descriptor, so computing twice and
//! keeping either is sound.

mod descriptor;

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::coder::{Codable, Described};
use crate::model::AttributeMap;
use crate::{Error, Result};

pub use descriptor::{TypeDescriptor, TypeDescriptorBuilder};

// ============================================================================
// Registry
// ============================================================================

/// Injectable registry: attribute-map cache + class-name table.
///
/// Created at startup, queried by type, no teardown. A process-global
/// instance is available through [`Registry::global`] for callers that do
/// not thread a registry explicitly.
pub struct Registry {
    attribute_maps: RwLock<HashMap<TypeId, Arc<AttributeMap>>>,
    classes: RwLock<HashMap<&'static str, &'static TypeDescriptor>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            attribute_maps: RwLock::new(HashMap::new()),
            classes: RwLock::new(HashMap::new()),
        }
    }

    /// The process-global registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    // ========================================================================
    // Class table
    // ========================================================================

    /// Record `T`'s descriptor under its class name. Idempotent; also
    /// registers the ancestor chain so archived parents resolve.
    pub fn register<T: Described>(&self) {
        let mut desc = Some(T::type_descriptor());
        while let Some(d) = desc {
            let inserted = self.classes.write().insert(d.name(), d).is_none();
            if inserted {
                debug!(class = d.name(), "registered codable type");
            }
            desc = d.parent();
        }
    }

    /// Look up a descriptor by class name.
    pub fn descriptor_named(&self, name: &str) -> Option<&'static TypeDescriptor> {
        self.classes.read().get(name).copied()
    }

    /// Build a fresh instance of the named class.
    pub fn construct(&self, name: &str) -> Result<Box<dyn Codable>> {
        self.descriptor_named(name)
            .map(|d| d.construct())
            .ok_or_else(|| Error::UnknownClass(name.to_owned()))
    }

    // ========================================================================
    // Attribute maps
    // ========================================================================

    /// The type's own codable attributes, memoized per `TypeId`.
    ///
    /// Pure function of the descriptor's own declarations; ancestors are
    /// never inspected here.
    pub fn attributes_of(&self, descriptor: &'static TypeDescriptor) -> Arc<AttributeMap> {
        if let Some(map) = self.attribute_maps.read().get(&descriptor.type_id()) {
            return Arc::clone(map);
        }

        // Compute outside the write lock; first insert wins.
        let computed = Arc::new(compute_attribute_map(descriptor));
        trace!(
            class = descriptor.name(),
            attributes = computed.len(),
            "computed attribute map"
        );

        let mut maps = self.attribute_maps.write();
        Arc::clone(maps.entry(descriptor.type_id()).or_insert(computed))
    }

    /// Own map merged with every ancestor's, most-derived wins on name
    /// collision. Computed on demand from the cached per-type maps.
    pub fn effective_attributes_of(&self, descriptor: &'static TypeDescriptor) -> AttributeMap {
        let mut chain: SmallVec<[&'static TypeDescriptor; 4]> = SmallVec::new();
        let mut current = Some(descriptor);
        while let Some(desc) = current {
            chain.push(desc);
            current = desc.parent();
        }

        // Root first, so derived entries overwrite ancestor entries.
        let mut merged = AttributeMap::new();
        for desc in chain.into_iter().rev() {
            for (name, kind) in self.attributes_of(desc).iter() {
                merged.insert(name.clone(), *kind);
            }
        }
        merged
    }

    /// Effective map for a live instance.
    pub fn effective_attributes(&self, object: &dyn Codable) -> AttributeMap {
        self.effective_attributes_of(object.descriptor())
    }
}

/// The matching rule, applied to one descriptor's own declarations.
fn compute_attribute_map(descriptor: &TypeDescriptor) -> AttributeMap {
    let mut map = AttributeMap::new();
    for &(name, kind) in descriptor.attributes() {
        if descriptor.skipped().contains(&name) {
            continue;
        }
        if field_backs(descriptor.storage_fields(), name) {
            map.insert(name.to_owned(), kind);
        }
    }
    map
}

/// A storage field backs `attribute` when its name is equal, or equal with a
/// leading underscore.
fn field_backs(fields: &[&str], attribute: &str) -> bool {
    fields
        .iter()
        .any(|f| *f == attribute || (f.starts_with('_') && f[1..] == *attribute))
}
