//! # Type Registry
//!
//! The static descriptor table the walker uses instead of runtime
//! reflection.
//!
//! Every entity type that can appear in a graph is registered once, with
//! its fields and their declared types. The registry is also where the
//! conventions of the loader are declared explicitly:
//! - which field carries the key and which one carries the version stamp
//! - which suffix marks a proxy type name
//! - which numeric values of a domain-special type map to which member

use crate::primitives::{DEFAULT_KEY_FIELD, DEFAULT_PROXY_SUFFIX, DEFAULT_VERSION_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// DECLARED FIELD TYPES
// =============================================================================

/// The closed set of sequence-like containers the classifier recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Fixed-size array (`T[]`).
    Array,
    /// Growable list (`List<T>`).
    List,
    /// Read-only enumerable (`IEnumerable<T>`), rebuilt as a list.
    Enumerable,
}

/// Declared type of a field, as registered in a `TypeDescriptor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Boolean,
    DateTime,
    String,
    Bytes,
    /// Single character. Registered for completeness, never rendered.
    Char,
    Nullable(Box<FieldType>),
    /// Symbolic enumeration, by enumeration type name.
    Enum(String),
    /// Domain-special value type, by type name.
    Special(String),
    Container(ContainerKind, Box<FieldType>),
    /// Reference to another entity type, by logical type name.
    Entity(String),
}

impl FieldType {
    #[must_use]
    pub fn nullable(inner: FieldType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    #[must_use]
    pub fn array(element: FieldType) -> Self {
        Self::Container(ContainerKind::Array, Box::new(element))
    }

    #[must_use]
    pub fn list(element: FieldType) -> Self {
        Self::Container(ContainerKind::List, Box::new(element))
    }

    #[must_use]
    pub fn enumerable(element: FieldType) -> Self {
        Self::Container(ContainerKind::Enumerable, Box::new(element))
    }

    #[must_use]
    pub fn entity(name: impl Into<String>) -> Self {
        Self::Entity(name.into())
    }

    #[must_use]
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    #[must_use]
    pub fn special(name: impl Into<String>) -> Self {
        Self::Special(name.into())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16 => f.write_str("Int16"),
            Self::Int32 => f.write_str("Int32"),
            Self::Int64 => f.write_str("Int64"),
            Self::Single => f.write_str("Single"),
            Self::Double => f.write_str("Double"),
            Self::Decimal => f.write_str("Decimal"),
            Self::Boolean => f.write_str("Boolean"),
            Self::DateTime => f.write_str("DateTime"),
            Self::String => f.write_str("String"),
            Self::Bytes => f.write_str("Byte[]"),
            Self::Char => f.write_str("Char"),
            Self::Nullable(inner) => write!(f, "Nullable<{inner}>"),
            Self::Enum(name) | Self::Special(name) | Self::Entity(name) => f.write_str(name),
            Self::Container(ContainerKind::Array, element) => write!(f, "{element}[]"),
            Self::Container(ContainerKind::List, element) => write!(f, "List<{element}>"),
            Self::Container(ContainerKind::Enumerable, element) => {
                write!(f, "IEnumerable<{element}>")
            }
        }
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// One registered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

/// The registered shape of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Start a descriptor for the given logical type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Register a field. Re-registering a name replaces its type.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.field_type = field_type,
            None => self.fields.push(FieldDescriptor { name, field_type }),
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in registration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// =============================================================================
// DOMAIN-SPECIAL VALUES
// =============================================================================

/// Maps `(type, numeric value)` to the symbolic member that renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialRegistry {
    members: BTreeMap<String, BTreeMap<i64, String>>,
}

impl SpecialRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named instance of a domain-special type.
    pub fn insert(&mut self, type_name: impl Into<String>, value: i64, member: impl Into<String>) {
        self.members
            .entry(type_name.into())
            .or_default()
            .insert(value, member.into());
    }

    /// Member name for a value, if one was registered.
    #[must_use]
    pub fn resolve(&self, type_name: &str, value: i64) -> Option<&str> {
        self.members
            .get(type_name)?
            .get(&value)
            .map(String::as_str)
    }
}

// =============================================================================
// TYPE REGISTRY
// =============================================================================

/// The complete descriptor table for one object model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDescriptor>,
    specials: SpecialRegistry,
    key_field: String,
    version_field: String,
    proxy_suffix: String,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            types: BTreeMap::new(),
            specials: SpecialRegistry::new(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            version_field: DEFAULT_VERSION_FIELD.to_string(),
            proxy_suffix: DEFAULT_PROXY_SUFFIX.to_string(),
        }
    }
}

impl TypeRegistry {
    /// Create an empty registry with the default conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type.
    #[must_use]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Register a named instance of a domain-special type.
    #[must_use]
    pub fn with_special(
        mut self,
        type_name: impl Into<String>,
        value: i64,
        member: impl Into<String>,
    ) -> Self {
        self.specials.insert(type_name, value, member);
        self
    }

    #[must_use]
    pub fn with_key_field(mut self, name: impl Into<String>) -> Self {
        self.key_field = name.into();
        self
    }

    #[must_use]
    pub fn with_version_field(mut self, name: impl Into<String>) -> Self {
        self.version_field = name.into();
        self
    }

    /// Set the proxy suffix. An empty suffix disables stripping.
    #[must_use]
    pub fn with_proxy_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.proxy_suffix = suffix.into();
        self
    }

    /// Register an entity type in place.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Recover the logical type name from a runtime (possibly proxy) name.
    #[must_use]
    pub fn logical_name<'a>(&self, runtime_name: &'a str) -> &'a str {
        if self.proxy_suffix.is_empty() {
            return runtime_name;
        }
        match runtime_name.strip_suffix(self.proxy_suffix.as_str()) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => runtime_name,
        }
    }

    /// Descriptor for a logical type name.
    #[must_use]
    pub fn descriptor(&self, logical_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(logical_name)
    }

    #[must_use]
    pub fn specials(&self) -> &SpecialRegistry {
        &self.specials
    }

    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    #[must_use]
    pub fn version_field(&self) -> &str {
        &self.version_field
    }

    /// Registered type names in deterministic order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_suffix_is_stripped() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.logical_name("ProductProxy"), "Product");
        assert_eq!(registry.logical_name("Product"), "Product");
        // A type literally named after the suffix keeps its name
        assert_eq!(registry.logical_name("Proxy"), "Proxy");
    }

    #[test]
    fn empty_suffix_disables_stripping() {
        let registry = TypeRegistry::new().with_proxy_suffix("");
        assert_eq!(registry.logical_name("ProductProxy"), "ProductProxy");
    }

    #[test]
    fn reregistering_field_replaces_type() {
        let descriptor = TypeDescriptor::new("Item")
            .field("Price", FieldType::Double)
            .field("Price", FieldType::Single);
        assert_eq!(descriptor.fields().len(), 1);
        assert_eq!(
            descriptor.get("Price").map(|f| &f.field_type),
            Some(&FieldType::Single)
        );
    }

    #[test]
    fn special_lookup_by_value() {
        let registry = TypeRegistry::new()
            .with_special("OrderStatus", 1, "Open")
            .with_special("OrderStatus", 2, "Shipped");
        assert_eq!(registry.specials().resolve("OrderStatus", 2), Some("Shipped"));
        assert_eq!(registry.specials().resolve("OrderStatus", 3), None);
        assert_eq!(registry.specials().resolve("Other", 1), None);
    }

    #[test]
    fn declared_type_names() {
        assert_eq!(FieldType::Int64.to_string(), "Int64");
        assert_eq!(FieldType::array(FieldType::Int64).to_string(), "Int64[]");
        assert_eq!(
            FieldType::list(FieldType::entity("Item")).to_string(),
            "List<Item>"
        );
        assert_eq!(
            FieldType::nullable(FieldType::DateTime).to_string(),
            "Nullable<DateTime>"
        );
    }
}
