//! Registry tests across types: effective-map inheritance, collision
//! resolution, permanent exclusion, and cache behavior under concurrency.

use std::sync::OnceLock;

use pretty_assertions::assert_eq;

use codable_rs::{
    AccessError, Codable, Described, Registry, Store, TypeDescriptor, Value, ValueKind,
};

// ============================================================================
// Fixtures: Shape ← Circle
// ============================================================================

#[derive(Default)]
struct Shape {
    name: String,
    // Declared as Int on the base, redeclared as Float on Circle.
    weight: i64,
}

impl Described for Shape {
    fn type_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| {
            TypeDescriptor::builder::<Shape>("Shape")
                .attribute("name", ValueKind::Text)
                .attribute("weight", ValueKind::Int)
                .storage_fields(&["name", "weight"])
                .build()
        })
    }
}

impl Codable for Shape {
    fn descriptor(&self) -> &'static TypeDescriptor {
        Shape::type_descriptor()
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name.clone())),
            "weight" => Some(Value::Int(self.weight)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        match name {
            "name" => self.name = value.as_str().ok_or(AccessError::NoSuchAttribute)?.to_owned(),
            "weight" => self.weight = value.as_int().ok_or(AccessError::NoSuchAttribute)?,
            _ => return Err(AccessError::NoSuchAttribute),
        }
        Ok(())
    }
}

#[derive(Default)]
struct Circle {
    base: Shape,
    count: i64,
    weight: f64,
}

impl Described for Circle {
    fn type_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| {
            TypeDescriptor::builder::<Circle>("Circle")
                .parent(Shape::type_descriptor)
                .attribute("count", ValueKind::Int)
                .attribute("weight", ValueKind::Float)
                .storage_fields(&["count", "weight"])
                .build()
        })
    }
}

impl Codable for Circle {
    fn descriptor(&self) -> &'static TypeDescriptor {
        Circle::type_descriptor()
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "count" => Some(Value::Int(self.count)),
            "weight" => Some(Value::Float(self.weight)),
            _ => self.base.get_attribute(name),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        match name {
            "count" => self.count = value.as_int().ok_or(AccessError::NoSuchAttribute)?,
            "weight" => self.weight = value.as_float().ok_or(AccessError::NoSuchAttribute)?,
            _ => return self.base.set_attribute(name, value),
        }
        Ok(())
    }
}

// ============================================================================
// Effective maps
// ============================================================================

#[test]
fn test_effective_map_includes_ancestor_attributes() {
    let registry = Registry::new();
    let effective = registry.effective_attributes_of(Circle::type_descriptor());

    // Base declares {name, weight}; derived declares {count, weight}.
    assert_eq!(effective.len(), 3);
    assert_eq!(effective.get("name"), Some(&ValueKind::Text));
    assert_eq!(effective.get("count"), Some(&ValueKind::Int));
}

#[test]
fn test_most_derived_wins_on_collision() {
    let registry = Registry::new();
    let effective = registry.effective_attributes_of(Circle::type_descriptor());
    assert_eq!(effective.get("weight"), Some(&ValueKind::Float));
}

#[test]
fn test_own_map_never_inspects_ancestors() {
    let registry = Registry::new();
    let own = registry.attributes_of(Circle::type_descriptor());
    assert!(!own.contains_key("name"));
    assert_eq!(own.len(), 2);
}

#[test]
fn test_inherited_attributes_round_trip() {
    let store = Store::new();
    store.register::<Circle>();

    let circle = Circle {
        base: Shape { name: "disc".into(), weight: 0 },
        count: 4,
        weight: 2.5,
    };

    let bytes = store.encode_to_bytes(&circle).unwrap();
    let restored: Circle = store.load_bytes_as(bytes).unwrap();

    assert_eq!(restored.base.name, "disc");
    assert_eq!(restored.count, 4);
    assert_eq!(restored.weight, 2.5);
}

#[test]
fn test_register_covers_the_ancestor_chain() {
    let registry = Registry::new();
    registry.register::<Circle>();
    assert!(registry.descriptor_named("Shape").is_some());
}

// ============================================================================
// Purity & concurrency
// ============================================================================

#[test]
fn test_attributes_of_is_pure() {
    let registry = Registry::new();
    let first: Vec<String> = registry
        .attributes_of(Shape::type_descriptor())
        .keys()
        .cloned()
        .collect();
    for _ in 0..100 {
        let again: Vec<String> = registry
            .attributes_of(Shape::type_descriptor())
            .keys()
            .cloned()
            .collect();
        assert_eq!(again, first);
    }
}

#[test]
fn test_concurrent_first_computation_agrees() {
    let registry = Registry::new();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = &registry;
                scope.spawn(move || {
                    registry
                        .attributes_of(Circle::type_descriptor())
                        .keys()
                        .cloned()
                        .collect::<Vec<String>>()
                })
            })
            .collect();

        let mut results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.dedup();
        assert_eq!(results.len(), 1);
    });
}
