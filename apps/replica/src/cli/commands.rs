//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::RestrictionConfig;
use crate::sample;
use replica_core::{ReplicaError, Script, script_checksum, script_hash, serialize};
use std::path::{Path, PathBuf};

/// Validate an output path.
///
/// The parent directory must exist and be a directory; the returned path
/// joins its canonical form with the original file name.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, ReplicaError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ReplicaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ReplicaError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ReplicaError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SAMPLE COMMAND
// =============================================================================

/// Serialize the order sample under a restriction config.
pub fn sample_script(config: &RestrictionConfig) -> Result<Script, ReplicaError> {
    serialize(
        &sample::root(),
        &sample::registry(),
        &config.globals(),
        &config.restrictions,
    )
}

/// Render the sample script in the requested format.
pub fn render_sample(config: &RestrictionConfig, format: &str) -> Result<String, ReplicaError> {
    let script = sample_script(config)?;

    match format {
        "text" => Ok(script.to_string()),
        "json" => serde_json::to_string_pretty(&script)
            .map_err(|e| ReplicaError::SerializationError(e.to_string())),
        _ => Err(ReplicaError::SerializationError(format!(
            "Unknown format: {}. Use: text, json",
            format
        ))),
    }
}

/// Print or write the sample script.
pub fn cmd_sample(
    config: &RestrictionConfig,
    output: Option<&Path>,
    format: &str,
) -> Result<(), ReplicaError> {
    // Validate before walking so a bad path fails fast
    let target = output.map(validate_output_path).transpose()?;
    let rendered = render_sample(config, format)?;

    match target {
        Some(path) => {
            std::fs::write(&path, rendered.as_bytes())
                .map_err(|e| ReplicaError::IoError(format!("Write file: {}", e)))?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "script written");
            println!("Wrote {} bytes to {:?}", rendered.len(), path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

// =============================================================================
// PRESETS COMMAND
// =============================================================================

/// Print the sample restriction presets.
pub fn cmd_presets() -> Result<(), ReplicaError> {
    let text = RestrictionConfig::sample().to_toml()?;
    print!("{}", text);
    Ok(())
}

// =============================================================================
// DIGEST COMMAND
// =============================================================================

/// Print the fingerprints of the sample script.
pub fn cmd_digest(config: &RestrictionConfig) -> Result<(), ReplicaError> {
    let script = sample_script(config)?;

    let checksum = script_checksum(&script)?;
    let hash = script_hash(&script)?;

    println!("Statements: {}", script.len());
    println!("Checksum:   {:016x}", checksum);
    println!("BLAKE3:     {}", hash);

    Ok(())
}
