//! # Type Classifier
//!
//! Maps a field's declared type to the rule the walker applies to it.
//!
//! - Scalars and nullable scalars are rendered inline in `Construct`
//! - Enumerations and domain-special values are rendered inline as members
//! - Sequences get their own `AssignSequence` statement
//! - Nested entities are walked recursively
//! - Anything else is unsupported and silently omitted

use crate::schema::{ContainerKind, FieldType};
use serde::{Deserialize, Serialize};

/// Scalar kinds with a literal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
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
}

impl ScalarKind {
    /// `true` for reference kinds, which accept null without a nullable wrapper.
    #[must_use]
    pub fn accepts_null(self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }
}

/// How the walker treats a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Scalar(ScalarKind),
    NullableScalar(ScalarKind),
    /// Symbolic enumeration, by enumeration type name.
    Enumeration(String),
    /// Domain-special value, by type name.
    DomainSpecial(String),
    Sequence {
        container: ContainerKind,
        /// Declared type name of the elements.
        element_type: String,
        element: Box<Classification>,
    },
    /// Nested entity, by logical type name.
    Nested(String),
    Unsupported,
}

impl Classification {
    /// `true` for everything rendered inline in a `Construct`.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Scalar(_) | Self::NullableScalar(_) | Self::Enumeration(_) | Self::DomainSpecial(_)
        )
    }
}

/// Classify a declared field type.
#[must_use]
pub fn classify(field_type: &FieldType) -> Classification {
    if let Some(kind) = scalar_kind(field_type) {
        return Classification::Scalar(kind);
    }

    match field_type {
        FieldType::Nullable(inner) => match inner.as_ref() {
            FieldType::Enum(name) => Classification::Enumeration(name.clone()),
            FieldType::Special(name) => Classification::DomainSpecial(name.clone()),
            other => scalar_kind(other)
                .map(Classification::NullableScalar)
                .unwrap_or(Classification::Unsupported),
        },
        FieldType::Enum(name) => Classification::Enumeration(name.clone()),
        FieldType::Special(name) => Classification::DomainSpecial(name.clone()),
        FieldType::Entity(name) => Classification::Nested(name.clone()),
        FieldType::Container(container, element) => {
            let element_class = classify(element);
            match element_class {
                Classification::Sequence { .. } | Classification::Unsupported => {
                    Classification::Unsupported
                }
                _ => Classification::Sequence {
                    container: *container,
                    element_type: element_type_name(element),
                    element: Box::new(element_class),
                },
            }
        }
        _ => Classification::Unsupported,
    }
}

/// Scalar kind of a non-nullable declared type, if it has one.
fn scalar_kind(field_type: &FieldType) -> Option<ScalarKind> {
    let kind = match field_type {
        FieldType::Int16 => ScalarKind::Int16,
        FieldType::Int32 => ScalarKind::Int32,
        FieldType::Int64 => ScalarKind::Int64,
        FieldType::Single => ScalarKind::Single,
        FieldType::Double => ScalarKind::Double,
        FieldType::Decimal => ScalarKind::Decimal,
        FieldType::Boolean => ScalarKind::Boolean,
        FieldType::DateTime => ScalarKind::DateTime,
        FieldType::String => ScalarKind::String,
        FieldType::Bytes => ScalarKind::Bytes,
        _ => return None,
    };
    Some(kind)
}

/// Element type name as it appears in `AssignSequence`.
///
/// Nullable elements keep the `?` shorthand so the rebuilt container
/// accepts nulls.
fn element_type_name(element: &FieldType) -> String {
    match element {
        FieldType::Nullable(inner) => format!("{inner}?"),
        other => other.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_scalars() {
        assert_eq!(
            classify(&FieldType::Int16),
            Classification::Scalar(ScalarKind::Int16)
        );
        assert_eq!(
            classify(&FieldType::String),
            Classification::Scalar(ScalarKind::String)
        );
        assert_eq!(
            classify(&FieldType::Bytes),
            Classification::Scalar(ScalarKind::Bytes)
        );
    }

    #[test]
    fn nullable_scalar() {
        assert_eq!(
            classify(&FieldType::nullable(FieldType::DateTime)),
            Classification::NullableScalar(ScalarKind::DateTime)
        );
    }

    #[test]
    fn char_is_unsupported() {
        assert_eq!(classify(&FieldType::Char), Classification::Unsupported);
        assert_eq!(
            classify(&FieldType::nullable(FieldType::Char)),
            Classification::Unsupported
        );
        assert_eq!(
            classify(&FieldType::list(FieldType::nullable(FieldType::Char))),
            Classification::Unsupported
        );
    }

    #[test]
    fn nested_nullable_is_unsupported() {
        let twice = FieldType::nullable(FieldType::nullable(FieldType::Int32));
        assert_eq!(classify(&twice), Classification::Unsupported);
    }

    #[test]
    fn sequence_of_entities() {
        let class = classify(&FieldType::list(FieldType::entity("Item")));
        assert_eq!(
            class,
            Classification::Sequence {
                container: ContainerKind::List,
                element_type: "Item".to_string(),
                element: Box::new(Classification::Nested("Item".to_string())),
            }
        );
        assert!(!class.is_inline());
    }

    #[test]
    fn sequence_of_scalars_keeps_element_kind() {
        let class = classify(&FieldType::array(FieldType::Int64));
        match class {
            Classification::Sequence {
                container,
                element_type,
                element,
            } => {
                assert_eq!(container, ContainerKind::Array);
                assert_eq!(element_type, "Int64");
                assert_eq!(*element, Classification::Scalar(ScalarKind::Int64));
            }
            other => unreachable!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn nullable_element_type_name() {
        let class = classify(&FieldType::list(FieldType::nullable(FieldType::Int32)));
        assert!(matches!(
            class,
            Classification::Sequence { ref element_type, .. } if element_type == "Int32?"
        ));
    }

    #[test]
    fn sequence_of_sequences_is_unsupported() {
        let nested = FieldType::list(FieldType::array(FieldType::Int32));
        assert_eq!(classify(&nested), Classification::Unsupported);
    }

    #[test]
    fn members_are_inline() {
        assert!(classify(&FieldType::enumeration("AddressType")).is_inline());
        assert!(classify(&FieldType::special("OrderStatus")).is_inline());
        assert!(!classify(&FieldType::entity("Customer")).is_inline());
    }
}
