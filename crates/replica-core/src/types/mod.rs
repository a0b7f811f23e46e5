//! # Core Type Definitions
//!
//! This module contains the object model the walker consumes and the
//! types every other module shares:
//! - The `Introspect` trait and `ObjectRef` handle for live objects
//! - Field values (`FieldValue`)
//! - Script paths (`Path`)
//! - Error types (`ReplicaError`)
//!
//! ## Object Model
//!
//! A live object only has to report its runtime type name and hand out
//! field values by name. Everything else (declared field types, key and
//! version fields, proxy naming) lives in the `TypeRegistry`, so the
//! object side stays a thin accessor layer over the caller's structs.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

// =============================================================================
// OBJECT MODEL
// =============================================================================

/// Read access to a live object in the graph being serialized.
///
/// Implementations are usually one `match` over field names on top of a
/// `RefCell`-wrapped domain struct, which is what allows the caller to
/// build cyclic graphs with `Rc`.
pub trait Introspect {
    /// Runtime type name, including any proxy suffix added by the loader.
    fn type_name(&self) -> &str;

    /// Current value of the named field.
    ///
    /// Returns `None` when the object has no field of that name.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Shared handle to a live object.
pub type ObjectRef = Rc<dyn Introspect>;

/// A field value read from a live object.
#[derive(Clone)]
pub enum FieldValue {
    Null,
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    String(String),
    Bytes(Vec<u8>),
    /// Symbolic enumeration member, by name.
    Enum(String),
    /// Domain-special value: resolved by `value`, `display` is informational.
    Special { value: i64, display: String },
    Object(ObjectRef),
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    /// Wrap a shared object.
    pub fn object<T: Introspect + 'static>(object: Rc<T>) -> Self {
        Self::Object(object)
    }

    /// Wrap an optional shared object, `None` becoming `Null`.
    pub fn optional_object<T: Introspect + 'static>(object: Option<Rc<T>>) -> Self {
        object.map_or(Self::Null, Self::object)
    }

    /// Build a sequence from anything convertible into field values.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Build a sequence of shared objects.
    pub fn objects<T: Introspect + 'static>(items: &[Rc<T>]) -> Self {
        Self::Sequence(items.iter().cloned().map(Self::object).collect())
    }

    /// Symbolic enumeration member.
    pub fn member(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short shape name used in diagnostics.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Single(_) => "single",
            Self::Double(_) => "double",
            Self::Decimal(_) => "decimal",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "datetime",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Special { .. } => "special",
            Self::Object(_) => "object",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Int16(v) => write!(f, "Int16({v})"),
            Self::Int32(v) => write!(f, "Int32({v})"),
            Self::Int64(v) => write!(f, "Int64({v})"),
            Self::Single(v) => write!(f, "Single({v})"),
            Self::Double(v) => write!(f, "Double({v})"),
            Self::Decimal(v) => write!(f, "Decimal({v})"),
            Self::Boolean(v) => write!(f, "Boolean({v})"),
            Self::DateTime(v) => write!(f, "DateTime({v})"),
            Self::String(v) => write!(f, "String({v:?})"),
            Self::Bytes(v) => write!(f, "Bytes({v:?})"),
            Self::Enum(v) => write!(f, "Enum({v})"),
            Self::Special { value, display } => write!(f, "Special({value}, {display:?})"),
            Self::Object(o) => write!(f, "Object({})", o.type_name()),
            Self::Sequence(items) => f.debug_list().entries(items).finish(),
        }
    }
}

macro_rules! field_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

field_value_from! {
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    bool => Boolean,
    NaiveDateTime => DateTime,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// PATH
// =============================================================================

/// The name at which a value is assigned in the script.
///
/// Root and sequence-element entities get synthesized names (`Order1`,
/// `Item0`); nested entities get dotted names (`Order1.Customer`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    /// Create a path from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Path of a field below this one.
    #[must_use]
    pub fn child(&self, field: &str) -> Self {
        Self(format!("{}.{}", self.0, field))
    }

    /// `true` for synthesized names, `false` for dotted member paths.
    #[must_use]
    pub fn is_binding(&self) -> bool {
        !self.0.contains('.')
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Replica system.
///
/// Only configuration problems are fatal to a walk; everything found
/// during traversal is handled per field and never surfaces here.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// A restriction names both include and exclude fields.
    #[error("Restriction for '{0}' names both include and exclude fields")]
    ConflictingRestriction(String),

    /// Two restrictions in one list target the same entity type.
    #[error("Duplicate restriction for entity type '{0}'")]
    DuplicateRestriction(String),

    /// A configuration source could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_child_is_dotted() {
        let root = Path::new("Order1");
        let child = root.child("Customer");
        assert_eq!(child.as_str(), "Order1.Customer");
        assert!(root.is_binding());
        assert!(!child.is_binding());
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<i32> = None;
        assert!(FieldValue::from(none).is_null());
        assert!(matches!(FieldValue::from(Some(5)), FieldValue::Int32(5)));
    }

    #[test]
    fn sequence_collects_values() {
        let value = FieldValue::sequence(["Summer", "Fall"]);
        match value {
            FieldValue::Sequence(items) => assert_eq!(items.len(), 2),
            other => unreachable!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn debug_shows_object_type() {
        struct Probe;
        impl Introspect for Probe {
            fn type_name(&self) -> &str {
                "Probe"
            }
            fn field(&self, _name: &str) -> Option<FieldValue> {
                None
            }
        }

        let value = FieldValue::object(Rc::new(Probe));
        assert_eq!(format!("{value:?}"), "Object(Probe)");
        assert_eq!(value.shape(), "object");
    }
}
