//! # Restriction Engine
//!
//! Field projection rules for the walk.
//!
//! - A global exclude set removes fields by name from every type
//! - A per-type restriction either includes only the named fields,
//!   excludes the named fields, or (when it names nothing) skips the
//!   entity type entirely
//!
//! Restrictions are compiled before traversal starts; a malformed set is
//! rejected there and no statement is emitted.

use crate::primitives::EXCLUDE_SEPARATOR;
use crate::types::ReplicaError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// GLOBAL EXCLUDES
// =============================================================================

/// Field names removed from every entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalExcludes(BTreeSet<String>);

impl GlobalExcludes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list. Entries are trimmed, blanks dropped.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        list.split(EXCLUDE_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(names.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for GlobalExcludes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for GlobalExcludes {
    fn from(list: &str) -> Self {
        Self::parse(list)
    }
}

// =============================================================================
// RESTRICTION
// =============================================================================

/// How a restriction projects its entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionMode {
    /// Only the named fields are emitted.
    Include,
    /// Every field except the named ones is emitted.
    Exclude,
    /// The entity type is omitted wherever it is referenced.
    SkipEntity,
}

/// A field projection for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Restriction {
    /// Logical entity type name.
    pub entity: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub include: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude: BTreeSet<String>,
}

impl Restriction {
    /// Emit only the named fields of `entity`.
    pub fn include<I, S>(entity: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity: entity.into(),
            include: fields.into_iter().map(Into::into).collect(),
            exclude: BTreeSet::new(),
        }
    }

    /// Emit every field of `entity` except the named ones.
    pub fn exclude<I, S>(entity: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity: entity.into(),
            include: BTreeSet::new(),
            exclude: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Omit `entity` wherever it is referenced.
    pub fn skip(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Projection mode. Only meaningful once `validate` has passed.
    #[must_use]
    pub fn mode(&self) -> RestrictionMode {
        if !self.include.is_empty() {
            RestrictionMode::Include
        } else if !self.exclude.is_empty() {
            RestrictionMode::Exclude
        } else {
            RestrictionMode::SkipEntity
        }
    }

    /// Reject a restriction that both includes and excludes fields.
    pub fn validate(&self) -> Result<(), ReplicaError> {
        if !self.include.is_empty() && !self.exclude.is_empty() {
            return Err(ReplicaError::ConflictingRestriction(self.entity.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// COMPILED SET
// =============================================================================

/// Validated restrictions, indexed by entity type name.
///
/// Keeps the caller's order for the script header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestrictionSet {
    ordered: Vec<Restriction>,
    index: BTreeMap<String, usize>,
}

impl RestrictionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restriction for a logical type name.
    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&Restriction> {
        self.index.get(entity).and_then(|&i| self.ordered.get(i))
    }

    /// Restrictions in the order they were given.
    #[must_use]
    pub fn as_slice(&self) -> &[Restriction] {
        &self.ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Validate and index a restriction list.
///
/// # Errors
///
/// - `ConflictingRestriction` if any restriction names both include and
///   exclude fields
/// - `DuplicateRestriction` if two restrictions target the same type
pub fn compile(restrictions: &[Restriction]) -> Result<RestrictionSet, ReplicaError> {
    let mut set = RestrictionSet::new();

    for restriction in restrictions {
        restriction.validate()?;
        if set.index.contains_key(&restriction.entity) {
            return Err(ReplicaError::DuplicateRestriction(
                restriction.entity.clone(),
            ));
        }
        set.index
            .insert(restriction.entity.clone(), set.ordered.len());
        set.ordered.push(restriction.clone());
    }

    Ok(set)
}

/// Decide whether a field is left out of the script.
///
/// The global exclude set wins over any per-type restriction.
#[must_use]
pub fn should_skip_field(
    field: &str,
    restriction: Option<&Restriction>,
    globals: &GlobalExcludes,
) -> bool {
    if globals.contains(field) {
        return true;
    }

    match restriction {
        None => false,
        Some(r) => match r.mode() {
            RestrictionMode::Include => !r.include.contains(field),
            RestrictionMode::Exclude => r.exclude.contains(field),
            RestrictionMode::SkipEntity => true,
        },
    }
}

/// `true` when the entity type is restricted to nothing.
#[must_use]
pub fn is_entity_fully_skipped(restriction: Option<&Restriction>) -> bool {
    restriction.is_some_and(|r| r.mode() == RestrictionMode::SkipEntity)
}

// =============================================================================
// TESTS
// =============================================================================
