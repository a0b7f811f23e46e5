//! # Reconstruction Script
//!
//! The ordered statement list a walk produces, and its text rendering.
//!
//! Statement order is a dependency order: any path a statement refers to
//! was constructed by an earlier statement.

use crate::literal::Literal;
use crate::primitives::INDENT;
use crate::restriction::{Restriction, RestrictionMode};
use crate::schema::ContainerKind;
use crate::types::Path;
use serde::Serialize;
use std::fmt;

// =============================================================================
// STATEMENTS
// =============================================================================

/// One `field = literal` pair inside a `Construct`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub field: String,
    pub value: Literal,
}

/// One element of an `AssignSequence`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Element {
    /// An entity constructed (or first constructed) at this path.
    Path(Path),
    Literal(Literal),
    Null,
}

/// A single script statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Statement {
    /// Create an entity at `path` with its inline fields set.
    Construct {
        path: Path,
        type_name: String,
        fields: Vec<Assignment>,
    },
    AssignNull {
        path: Path,
        field: String,
    },
    /// Point `path.field` at an entity constructed earlier.
    AssignReference {
        path: Path,
        field: String,
        target: Path,
    },
    /// Attach the entity just constructed at `child` to `path.field`.
    AssignNested {
        path: Path,
        field: String,
        child: Path,
    },
    AssignSequence {
        path: Path,
        field: String,
        container: ContainerKind,
        element_type: String,
        elements: Vec<Element>,
    },
}

impl Statement {
    /// Path of the entity this statement constructs or mutates.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Construct { path, .. }
            | Self::AssignNull { path, .. }
            | Self::AssignReference { path, .. }
            | Self::AssignNested { path, .. }
            | Self::AssignSequence { path, .. } => path,
        }
    }

    #[must_use]
    pub fn is_construct(&self) -> bool {
        matches!(self, Self::Construct { .. })
    }
}

// =============================================================================
// SCRIPT
// =============================================================================

/// The projection settings a script was produced under.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptHeader {
    pub global_excludes: Vec<String>,
    pub restrictions: Vec<Restriction>,
}

/// The ordered output of one walk.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Script {
    header: ScriptHeader,
    statements: Vec<Statement>,
}

impl Script {
    #[must_use]
    pub fn new(header: ScriptHeader) -> Self {
        Self {
            header,
            statements: Vec::new(),
        }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    #[must_use]
    pub fn header(&self) -> &ScriptHeader {
        &self.header
    }

    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// `Construct` statements in script order.
    pub fn constructs(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(|s| s.is_construct())
    }

    /// Number of `Construct` statements for a type.
    #[must_use]
    pub fn construct_count(&self, type_name: &str) -> usize {
        self.constructs()
            .filter(|s| matches!(s, Statement::Construct { type_name: t, .. } if t == type_name))
            .count()
    }

    /// The `Construct` statement at a path, if any.
    #[must_use]
    pub fn construct_at(&self, path: &str) -> Option<&Statement> {
        self.constructs().find(|s| s.path().as_str() == path)
    }
}

// =============================================================================
// RENDERING
// =============================================================================

impl fmt::Display for ScriptHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.global_excludes.is_empty() {
            writeln!(f, "// Globally Excluded Properties:")?;
            writeln!(f, "//  {}", self.global_excludes.join(","))?;
        }

        if !self.restrictions.is_empty() {
            writeln!(f, "// Restricted Entities:")?;
            for r in &self.restrictions {
                writeln!(f, "// {}", r.entity)?;
                match r.mode() {
                    RestrictionMode::Include => {
                        writeln!(f, "//  Allowed Properties: {}", join_names(&r.include))?;
                    }
                    RestrictionMode::Exclude => {
                        writeln!(f, "//  Excluded Properties: {}", join_names(&r.exclude))?;
                    }
                    RestrictionMode::SkipEntity => writeln!(f, "//  Skipped")?,
                }
            }
        }

        Ok(())
    }
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn element_list(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| match e {
            Element::Path(p) => p.to_string(),
            Element::Literal(l) => l.to_string(),
            Element::Null => "null".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construct {
                path,
                type_name,
                fields,
            } => {
                if path.is_binding() {
                    write!(f, "var {path} = new {type_name}")?;
                } else {
                    write!(f, "{path} = new {type_name}")?;
                }
                if fields.is_empty() {
                    return write!(f, "();");
                }
                writeln!(f)?;
                writeln!(f, "{{")?;
                for (i, a) in fields.iter().enumerate() {
                    let sep = if i + 1 < fields.len() { "," } else { "" };
                    writeln!(f, "{INDENT}{} = {}{sep}", a.field, a.value)?;
                }
                write!(f, "}};")
            }
            Self::AssignNull { path, field } => write!(f, "{path}.{field} = null;"),
            Self::AssignReference {
                path,
                field,
                target,
            } => write!(f, "{path}.{field} = {target};"),
            Self::AssignNested { path, field, child } => {
                write!(f, "{path}.{field} = {child};")
            }
            Self::AssignSequence {
                path,
                field,
                container,
                element_type,
                elements,
            } => {
                let body = element_list(elements);
                match (container, elements.is_empty()) {
                    (ContainerKind::Array, true) => {
                        write!(f, "{path}.{field} = new {element_type}[0];")
                    }
                    (ContainerKind::Array, false) => {
                        write!(f, "{path}.{field} = new {element_type}[] {{ {body} }};")
                    }
                    (_, true) => write!(f, "{path}.{field} = new List<{element_type}>();"),
                    (_, false) => {
                        write!(f, "{path}.{field} = new List<{element_type}> {{ {body} }};")
                    }
                }
            }
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for statement in &self.statements {
            // A construct at a member path already assigns itself.
            if let Statement::AssignNested { path, field, child } = statement {
                if child == &path.child(field) {
                    continue;
                }
            }
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
