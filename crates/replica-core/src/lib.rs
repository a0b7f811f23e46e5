//! # replica-core
//!
//! The deterministic snapshot engine for Replica - THE LOGIC.
//!
//! This crate turns a live, possibly cyclic object graph into an ordered
//! reconstruction script: statements that, replayed by a compatible
//! builder, rebuild an equivalent graph with the same sharing.
//!
//! ## Pipeline
//!
//! - `identity`: `(logical type, key)` identity of every visited object
//! - `restriction`: global excludes and per-type include/exclude/skip
//! - `classify`: declared field type → walk rule
//! - `literal`: scalar value → source literal
//! - `walker`: depth-first traversal with a history table
//! - `script`: the statement list and its text rendering
//! - `digest`: canonical encoding and fingerprints of a script
//!
//! ## Architectural Constraints
//!
//! - Synchronous and single-threaded; one `Walker` owns all walk state
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no randomness, no clocks
//! - Never panics; configuration errors surface as `ReplicaError`

// =============================================================================
// MODULES
// =============================================================================

pub mod classify;
pub mod digest;
pub mod identity;
pub mod literal;
pub mod primitives;
pub mod restriction;
pub mod schema;
pub mod script;
pub mod types;
pub mod walker;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{FieldValue, Introspect, ObjectRef, Path, ReplicaError};

// =============================================================================
// RE-EXPORTS: Schema & Classification
// =============================================================================

pub use classify::{Classification, ScalarKind, classify};
pub use schema::{
    ContainerKind, FieldDescriptor, FieldType, SpecialRegistry, TypeDescriptor, TypeRegistry,
};

// =============================================================================
// RE-EXPORTS: Walk
// =============================================================================

pub use identity::{Entity, EntityId, entity_id, identify};
pub use literal::{Literal, format_scalar, format_value};
pub use restriction::{
    GlobalExcludes, Restriction, RestrictionMode, RestrictionSet, compile,
    is_entity_fully_skipped, should_skip_field,
};
pub use script::{Assignment, Element, Script, ScriptHeader, Statement};
pub use walker::{Outcome, Walker, serialize};

// =============================================================================
// RE-EXPORTS: Digest
// =============================================================================

pub use digest::{export_canonical, script_checksum};

#[cfg(feature = "crypto-hash")]
pub use digest::{script_hash, verify_script_hash};
