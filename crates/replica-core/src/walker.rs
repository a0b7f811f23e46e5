//! # Graph Walker
//!
//! Depth-first traversal that turns a live object graph into a `Script`.
//!
//! ## Invariants
//!
//! - Every entity is constructed at most once; later encounters emit a
//!   reference to the path it was first constructed at
//! - An entity is recorded in the history before any of its children are
//!   visited, so cycles terminate
//! - Field order inside `Construct` is key first, then alphabetical, with
//!   the version field last; nested and sequence fields follow in
//!   alphabetical order
//!
//! The history and the statement accumulator are owned by one `Walker`.
//! Nothing is shared between walks.

use crate::classify::{Classification, classify};
use crate::identity::{EntityId, entity_id};
use crate::literal::format_value;
use crate::restriction::{
    GlobalExcludes, Restriction, RestrictionSet, compile, is_entity_fully_skipped,
    should_skip_field,
};
use crate::schema::{ContainerKind, FieldDescriptor, TypeRegistry};
use crate::script::{Assignment, Element, Script, ScriptHeader, Statement};
use crate::types::{FieldValue, ObjectRef, Path, ReplicaError};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// OUTCOME
// =============================================================================

/// What a single visit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entity was constructed at this path.
    Constructed(Path),
    /// The entity was already constructed at this path.
    Referenced(Path),
    /// The entity type is skipped; nothing was emitted.
    Skipped,
}

impl Outcome {
    /// Path the entity can be reached at, unless it was skipped.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Constructed(p) | Self::Referenced(p) => Some(p),
            Self::Skipped => None,
        }
    }
}

/// Where an object sits relative to its parent.
enum Slot<'p> {
    /// The root object, or a sequence element. Bound to a synthesized name.
    Binding,
    /// A nested entity field; constructed at `owner.field`.
    Field { owner: &'p Path, field: &'p str },
}

// =============================================================================
// WALKER
// =============================================================================

/// Traversal context for one serialization.
pub struct Walker<'a> {
    registry: &'a TypeRegistry,
    restrictions: &'a RestrictionSet,
    globals: &'a GlobalExcludes,
    history: BTreeMap<EntityId, Path>,
    names: BTreeSet<String>,
    script: Script,
}

impl<'a> Walker<'a> {
    /// Create a walker over a compiled restriction set.
    #[must_use]
    pub fn new(
        registry: &'a TypeRegistry,
        restrictions: &'a RestrictionSet,
        globals: &'a GlobalExcludes,
    ) -> Self {
        let header = ScriptHeader {
            global_excludes: globals.iter().map(str::to_string).collect(),
            restrictions: restrictions.as_slice().to_vec(),
        };

        Self {
            registry,
            restrictions,
            globals,
            history: BTreeMap::new(),
            names: BTreeSet::new(),
            script: Script::new(header),
        }
    }

    /// Walk a root object.
    pub fn walk(&mut self, root: &ObjectRef) -> Outcome {
        self.visit(root, Slot::Binding)
    }

    /// Number of distinct entities seen so far.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.history.len()
    }

    /// Path an entity was first constructed at.
    #[must_use]
    pub fn path_of(&self, id: &EntityId) -> Option<&Path> {
        self.history.get(id)
    }

    /// Consume the walker and return the accumulated script.
    #[must_use]
    pub fn finish(self) -> Script {
        self.script
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    fn visit(&mut self, object: &ObjectRef, slot: Slot<'_>) -> Outcome {
        let id = entity_id(object, self.registry);

        if let Some(existing) = self.history.get(&id) {
            tracing::trace!(entity = %id, path = %existing, "reference emitted");
            return Outcome::Referenced(existing.clone());
        }

        let restrictions = self.restrictions;
        let restriction = restrictions.get(id.type_name());
        if is_entity_fully_skipped(restriction) {
            tracing::trace!(entity = %id, "entity type skipped");
            return Outcome::Skipped;
        }

        let path = match slot {
            Slot::Field { owner, field } => owner.child(field),
            Slot::Binding => self.bind(&id),
        };

        self.history.insert(id.clone(), path.clone());
        tracing::debug!(entity = %id, path = %path, "entity added");

        self.emit_entity(object, &id, restriction, &path);
        Outcome::Constructed(path)
    }

    /// Synthesize a unique binding name `{Type}{key}`, suffixed `_n` on collision.
    ///
    /// A negative key is written `N{abs}` so the name stays an identifier.
    fn bind(&mut self, id: &EntityId) -> Path {
        let key = id.key();
        let base = if key < 0 {
            format!("{}N{}", id.type_name(), key.unsigned_abs())
        } else {
            format!("{}{}", id.type_name(), key)
        };
        let mut name = base.clone();
        let mut n = 1usize;
        while self.names.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        self.names.insert(name.clone());
        Path::new(name)
    }

    fn emit_entity(
        &mut self,
        object: &ObjectRef,
        id: &EntityId,
        restriction: Option<&Restriction>,
        path: &Path,
    ) {
        let registry = self.registry;
        let Some(descriptor) = registry.descriptor(id.type_name()) else {
            tracing::warn!(entity = %id, "no descriptor registered, constructing without fields");
            self.script.push(Statement::Construct {
                path: path.clone(),
                type_name: id.type_name().to_string(),
                fields: Vec::new(),
            });
            return;
        };

        let mut inline: Vec<(&FieldDescriptor, Classification)> = Vec::new();
        let mut deferred: Vec<(&FieldDescriptor, Classification)> = Vec::new();

        for fd in descriptor.fields() {
            if should_skip_field(&fd.name, restriction, self.globals) {
                tracing::trace!(entity = %id, field = %fd.name, "field filtered");
                continue;
            }
            match classify(&fd.field_type) {
                Classification::Unsupported => {
                    tracing::trace!(entity = %id, field = %fd.name, "unsupported field kind");
                }
                class if class.is_inline() => inline.push((fd, class)),
                class => deferred.push((fd, class)),
            }
        }

        let key_field = registry.key_field();
        let version_field = registry.version_field();
        inline.sort_by(|(a, _), (b, _)| {
            field_rank(&a.name, key_field, version_field)
                .cmp(&field_rank(&b.name, key_field, version_field))
                .then_with(|| a.name.cmp(&b.name))
        });
        deferred.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

        let mut fields = Vec::with_capacity(inline.len());
        for (fd, class) in &inline {
            let value = read_field(object, &fd.name);
            match format_value(class, &value, registry.specials()) {
                Some(literal) => fields.push(Assignment {
                    field: fd.name.clone(),
                    value: literal,
                }),
                None => tracing::warn!(
                    entity = %id,
                    field = %fd.name,
                    declared = %fd.field_type,
                    found = value.shape(),
                    "value does not match declared type, field omitted"
                ),
            }
        }

        self.script.push(Statement::Construct {
            path: path.clone(),
            type_name: id.type_name().to_string(),
            fields,
        });

        for (fd, class) in deferred {
            let value = read_field(object, &fd.name);
            match class {
                Classification::Nested(_) => self.emit_nested(id, path, &fd.name, value),
                Classification::Sequence {
                    container,
                    element_type,
                    element,
                } => self.emit_sequence(
                    id,
                    path,
                    &fd.name,
                    value,
                    container,
                    element_type,
                    &element,
                ),
                _ => {}
            }
        }
    }

    fn emit_nested(&mut self, owner_id: &EntityId, path: &Path, field: &str, value: FieldValue) {
        match value {
            FieldValue::Null => self.script.push(Statement::AssignNull {
                path: path.clone(),
                field: field.to_string(),
            }),
            FieldValue::Object(child) => {
                let slot = Slot::Field { owner: path, field };
                match self.visit(&child, slot) {
                    Outcome::Constructed(child) => self.script.push(Statement::AssignNested {
                        path: path.clone(),
                        field: field.to_string(),
                        child,
                    }),
                    Outcome::Referenced(target) => self.script.push(Statement::AssignReference {
                        path: path.clone(),
                        field: field.to_string(),
                        target,
                    }),
                    Outcome::Skipped => {}
                }
            }
            other => tracing::warn!(
                entity = %owner_id,
                field,
                found = other.shape(),
                "expected an entity, field omitted"
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_sequence(
        &mut self,
        owner_id: &EntityId,
        path: &Path,
        field: &str,
        value: FieldValue,
        container: ContainerKind,
        element_type: String,
        element: &Classification,
    ) {
        let items = match value {
            FieldValue::Null => Vec::new(),
            FieldValue::Sequence(items) => items,
            other => {
                tracing::warn!(
                    entity = %owner_id,
                    field,
                    found = other.shape(),
                    "expected a sequence, field omitted"
                );
                return;
            }
        };

        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            match (element, item) {
                (_, FieldValue::Null) => elements.push(Element::Null),
                (Classification::Nested(_), FieldValue::Object(child)) => {
                    if let Some(p) = self.visit(&child, Slot::Binding).path() {
                        elements.push(Element::Path(p.clone()));
                    }
                }
                (class, item) => match format_value(class, &item, self.registry.specials()) {
                    Some(literal) => elements.push(Element::Literal(literal)),
                    None => tracing::warn!(
                        entity = %owner_id,
                        field,
                        found = item.shape(),
                        "element does not match declared type, element dropped"
                    ),
                },
            }
        }

        self.script.push(Statement::AssignSequence {
            path: path.clone(),
            field: field.to_string(),
            container,
            element_type,
            elements,
        });
    }
}

/// Sort rank within `Construct`: key, everything else, version.
fn field_rank(name: &str, key_field: &str, version_field: &str) -> u8 {
    if name == key_field {
        0
    } else if name == version_field {
        2
    } else {
        1
    }
}

/// A registered field the object does not expose reads as null.
fn read_field(object: &ObjectRef, name: &str) -> FieldValue {
    object.field(name).unwrap_or(FieldValue::Null)
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Serialize an object graph into a reconstruction script.
///
/// Restrictions are validated before traversal starts. The root is always a
/// live object; null is only reachable through a field, where it becomes
/// `AssignNull` (entity fields) or an empty `AssignSequence` (collections).
///
/// # Errors
///
/// - `ConflictingRestriction` if a restriction both includes and excludes
/// - `DuplicateRestriction` if two restrictions name the same type
pub fn serialize(
    root: &ObjectRef,
    registry: &TypeRegistry,
    global_excludes: &GlobalExcludes,
    restrictions: &[Restriction],
) -> Result<Script, ReplicaError> {
    let compiled = compile(restrictions)?;

    let mut walker = Walker::new(registry, &compiled, global_excludes);
    let outcome = walker.walk(root);
    tracing::debug!(
        entities = walker.entity_count(),
        root = ?outcome.path(),
        "walk complete"
    );

    Ok(walker.finish())
}

// =============================================================================
// TESTS
// =============================================================================
