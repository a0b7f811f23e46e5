//! # Replica CLI Module
//!
//! This module implements the CLI interface for Replica.
//!
//! ## Available Commands
//!
//! - `sample` - Serialize the built-in order sample graph
//! - `presets` - Print the sample restriction presets as TOML
//! - `digest` - Print the checksum and BLAKE3 hash of the sample script

mod commands;

use crate::config::RestrictionConfig;
use clap::{Parser, Subcommand};
use replica_core::ReplicaError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Replica - object graph snapshots as reconstruction scripts
///
/// Walks an entity graph and prints the statements that rebuild it.
#[derive(Parser, Debug)]
#[command(name = "replica")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML file with global excludes and restrictions
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Comma-separated fields to exclude from every type
    #[arg(short, long, global = true)]
    pub exclude: Option<String>,

    /// Restriction: Type=+A,B (include), Type=-C (exclude), Type= (skip)
    #[arg(short, long = "restrict", global = true)]
    pub restrict: Vec<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serialize the order sample graph
    Sample {
        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short = 't', long, default_value = "text")]
        format: String,
    },

    /// Print the sample restriction presets as TOML
    Presets,

    /// Print the digest of the sample script
    Digest,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Build the effective restriction config from the file and the flags.
///
/// Without `--config` the sample driver's projection is the base.
pub fn resolve_config(cli: &Cli) -> Result<RestrictionConfig, ReplicaError> {
    let mut config = match &cli.config {
        Some(path) => RestrictionConfig::load(path)?,
        None => RestrictionConfig::driver_default(),
    };

    if let Some(list) = &cli.exclude {
        config.add_excludes(list);
    }
    for spec in &cli.restrict {
        config.apply_restrict(spec)?;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ReplicaError> {
    match &cli.command {
        Some(Commands::Presets) => cmd_presets(),
        Some(Commands::Sample { output, format }) => {
            let config = resolve_config(&cli)?;
            cmd_sample(&config, output.as_deref(), format)
        }
        Some(Commands::Digest) => {
            let config = resolve_config(&cli)?;
            cmd_digest(&config)
        }
        None => {
            // No subcommand - print the sample script
            let config = resolve_config(&cli)?;
            cmd_sample(&config, None, "text")
        }
    }
}
