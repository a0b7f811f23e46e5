//! # Fixed Conventions
//!
//! Naming conventions and literal markers compiled into the engine.
//!
//! The registry can override the field and suffix names per walk; the
//! literal markers are part of the script format and never change.

/// Field that carries an entity's key unless the registry says otherwise.
pub const DEFAULT_KEY_FIELD: &str = "Key";

/// Field rendered last in every `Construct` (optimistic-concurrency stamp).
pub const DEFAULT_VERSION_FIELD: &str = "Timestamp";

/// Suffix the lazy loader appends to proxy type names.
pub const DEFAULT_PROXY_SUFFIX: &str = "Proxy";

/// Separator for the comma-separated global exclude list.
pub const EXCLUDE_SEPARATOR: char = ',';

// =============================================================================
// LITERAL MARKERS
// =============================================================================

/// Suffix on 64-bit integer literals.
pub const INT64_MARKER: &str = "L";

/// Suffix on single-precision literals.
pub const SINGLE_MARKER: &str = "F";

/// Suffix on double-precision literals.
pub const DOUBLE_MARKER: &str = "D";

/// Suffix on decimal literals.
pub const DECIMAL_MARKER: &str = "M";

/// Indentation inside a rendered `Construct` block.
pub const INDENT: &str = "\t";
