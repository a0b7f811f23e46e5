//! # Replica
//!
//! The command-line front end for `replica-core`: restriction config,
//! the order sample domain, and the `replica` commands.

pub mod cli;
pub mod config;
pub mod sample;
