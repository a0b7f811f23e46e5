//! # Restriction Configuration
//!
//! The projection a script is produced under: global excludes plus
//! per-type restrictions, loaded from TOML and adjusted by CLI flags.
//!
//! ```toml
//! global_excludes = ["IsPersistent", "Timestamp", "ImportBatch"]
//!
//! [[restriction]]
//! entity = "Product"
//! include = ["Key", "Code", "Description", "IsPaid"]
//! ```

use replica_core::primitives::EXCLUDE_SEPARATOR;
use replica_core::{GlobalExcludes, ReplicaError, Restriction, compile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Global excludes and per-type restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestrictionConfig {
    #[serde(default)]
    pub global_excludes: Vec<String>,

    #[serde(default, rename = "restriction", skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<Restriction>,
}

impl RestrictionConfig {
    /// The projection the sample driver uses: only `Description` is hidden.
    #[must_use]
    pub fn driver_default() -> Self {
        Self {
            global_excludes: vec!["Description".to_string()],
            restrictions: Vec::new(),
        }
    }

    /// Sample presets for ORM-backed fixtures.
    ///
    /// Hides persistence bookkeeping everywhere, reduces shopping carts to
    /// their key and products to four identifying fields.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            global_excludes: ["IsPersistent", "Timestamp", "ImportBatch"]
                .map(String::from)
                .to_vec(),
            restrictions: vec![
                Restriction::include("ShoppingCart", ["Key"]),
                Restriction::include("Product", ["Key", "Code", "Description", "IsPaid"]),
            ],
        }
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ReplicaError> {
        toml::from_str(text).map_err(|e| ReplicaError::Config(format!("Invalid config: {e}")))
    }

    /// Render as a TOML document.
    pub fn to_toml(&self) -> Result<String, ReplicaError> {
        toml::to_string_pretty(self)
            .map_err(|e| ReplicaError::SerializationError(format!("TOML: {e}")))
    }

    /// Load and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ReplicaError> {
        let canonical = path.canonicalize().map_err(|e| {
            ReplicaError::IoError(format!("Invalid config path '{}': {}", path.display(), e))
        })?;

        let metadata = std::fs::metadata(&canonical)
            .map_err(|e| ReplicaError::IoError(format!("Cannot read file metadata: {e}")))?;
        if !metadata.is_file() {
            return Err(ReplicaError::IoError(format!(
                "Path '{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ReplicaError::Config(format!(
                "Config size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(&canonical)
            .map_err(|e| ReplicaError::IoError(format!("Read config: {e}")))?;
        let config = Self::from_toml(&text)?;

        tracing::debug!(
            path = %canonical.display(),
            excludes = config.global_excludes.len(),
            restrictions = config.restrictions.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Add comma-separated names to the global exclude list.
    pub fn add_excludes(&mut self, list: &str) {
        for name in GlobalExcludes::parse(list).iter() {
            if !self.global_excludes.iter().any(|n| n == name) {
                self.global_excludes.push(name.to_string());
            }
        }
    }

    /// Apply a `--restrict` flag, replacing any restriction for the same type.
    pub fn apply_restrict(&mut self, spec: &str) -> Result<(), ReplicaError> {
        let restriction = parse_restrict(spec)?;
        match self
            .restrictions
            .iter_mut()
            .find(|r| r.entity == restriction.entity)
        {
            Some(existing) => *existing = restriction,
            None => self.restrictions.push(restriction),
        }
        Ok(())
    }

    /// The global exclude list as a set.
    #[must_use]
    pub fn globals(&self) -> GlobalExcludes {
        self.global_excludes.iter().map(String::as_str).collect()
    }

    /// Check the restrictions the same way a walk would.
    pub fn validate(&self) -> Result<(), ReplicaError> {
        compile(&self.restrictions).map(|_| ())
    }
}

/// Parse `Type=+A,B` (include), `Type=-C` (exclude) or `Type=` (skip).
///
/// A field list with no sign is an include list.
pub fn parse_restrict(spec: &str) -> Result<Restriction, ReplicaError> {
    let (entity, fields) = spec.split_once('=').ok_or_else(|| {
        ReplicaError::Config(format!("Invalid restriction '{spec}': expected Type=FIELDS"))
    })?;

    let entity = entity.trim();
    if entity.is_empty() {
        return Err(ReplicaError::Config(format!(
            "Invalid restriction '{spec}': missing type name"
        )));
    }

    let fields = fields.trim();
    let names = |list: &str| -> Vec<String> {
        list.split(EXCLUDE_SEPARATOR)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect()
    };

    let restriction = if let Some(list) = fields.strip_prefix('-') {
        Restriction::exclude(entity, names(list))
    } else {
        Restriction::include(entity, names(fields.trim_start_matches('+')))
    };
    Ok(restriction)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use replica_core::RestrictionMode;

    #[test]
    fn parse_restrict_modes() {
        let include = parse_restrict("Product=+Key, Code").expect("include");
        assert_eq!(include.mode(), RestrictionMode::Include);
        assert!(include.include.contains("Code"));

        let bare = parse_restrict("Product=Key").expect("bare");
        assert_eq!(bare.mode(), RestrictionMode::Include);

        let exclude = parse_restrict("Order=-Hold").expect("exclude");
        assert_eq!(exclude.mode(), RestrictionMode::Exclude);

        let skip = parse_restrict("Audit=").expect("skip");
        assert_eq!(skip.mode(), RestrictionMode::SkipEntity);
    }

    #[test]
    fn parse_restrict_rejects_malformed() {
        assert!(matches!(
            parse_restrict("Product"),
            Err(ReplicaError::Config(_))
        ));
        assert!(matches!(parse_restrict("=Key"), Err(ReplicaError::Config(_))));
    }

    #[test]
    fn sample_presets_roundtrip_through_toml() {
        let sample = RestrictionConfig::sample();
        let text = sample.to_toml().expect("to toml");
        assert!(text.contains("[[restriction]]"));

        let parsed = RestrictionConfig::from_toml(&text).expect("from toml");
        assert_eq!(parsed, sample);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = RestrictionConfig::from_toml("global_exclude = [\"Key\"]\n");
        assert!(matches!(result, Err(ReplicaError::Config(_))));
    }

    #[test]
    fn restrict_flag_replaces_existing() {
        let mut config = RestrictionConfig::sample();
        config.apply_restrict("Product=-Code").expect("apply");

        assert_eq!(config.restrictions.len(), 2);
        let product = config
            .restrictions
            .iter()
            .find(|r| r.entity == "Product")
            .expect("product restriction");
        assert_eq!(product.mode(), RestrictionMode::Exclude);
    }

    #[test]
    fn excludes_are_merged_without_duplicates() {
        let mut config = RestrictionConfig::driver_default();
        config.add_excludes("Timestamp, Description");

        assert_eq!(config.global_excludes, vec!["Description", "Timestamp"]);
        assert!(config.globals().contains("Timestamp"));
    }
}
