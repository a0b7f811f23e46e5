//! # Entity Identity Resolver
//!
//! Computes the identity the walker deduplicates on.
//!
//! Identity is the pair `(logical type name, key)`. Two objects with the
//! same pair are the same entity even when the loader hydrated them as
//! separate instances (or one of them as a proxy).

use crate::schema::TypeRegistry;
use crate::types::{FieldValue, ObjectRef, Path};
use std::fmt;
use std::rc::Rc;

/// Identity of an entity within one walk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    type_name: String,
    key: i64,
    /// Allocation of a keyless object. `None` for keyed entities.
    instance: Option<usize>,
}

impl EntityId {
    /// Identity of a keyed entity.
    #[must_use]
    pub fn keyed(type_name: impl Into<String>, key: i64) -> Self {
        Self {
            type_name: type_name.into(),
            key,
            instance: None,
        }
    }

    /// Logical type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Key value; `0` for keyless entities.
    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    /// `true` when the object had no usable key field.
    #[must_use]
    pub fn is_keyless(&self) -> bool {
        self.instance.is_some()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keyless() {
            write!(f, "{}:{} (keyless)", self.type_name, self.key)
        } else {
            write!(f, "{}:{}", self.type_name, self.key)
        }
    }
}

/// An identity together with the path it was first assigned at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub path: Path,
}

/// Resolve an object's identity and pair it with a path.
#[must_use]
pub fn identify(object: &ObjectRef, registry: &TypeRegistry, path: Path) -> Entity {
    Entity {
        id: entity_id(object, registry),
        path,
    }
}

/// Resolve an object's identity.
///
/// A missing or null key field gives key `0`, and the object is then told
/// apart from other keyless objects by its allocation only.
#[must_use]
pub fn entity_id(object: &ObjectRef, registry: &TypeRegistry) -> EntityId {
    let type_name = registry.logical_name(object.type_name()).to_string();

    match object.field(registry.key_field()) {
        None | Some(FieldValue::Null) => EntityId {
            type_name,
            key: 0,
            instance: Some(Rc::as_ptr(object).cast::<()>() as usize),
        },
        Some(value) => EntityId::keyed(type_name, coerce_key(&value)),
    }
}

/// Widen a key value to `i64`. Unconvertible keys become `0`.
fn coerce_key(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Int16(v) => i64::from(*v),
        FieldValue::Int32(v) => i64::from(*v),
        FieldValue::Int64(v) => *v,
        FieldValue::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// =============================================================================
// TESTS
// =============================================================================
