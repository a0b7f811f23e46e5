//! # Replica - Object Graph Snapshots
//!
//! The main binary for the Replica reconstruction-script serializer.
//!
//! ## Usage
//!
//! ```bash
//! # Print the sample script
//! replica sample
//!
//! # Write it as JSON, hiding timestamps and skipping categories
//! replica sample -o order.json -t json -e Timestamp -r Category=
//!
//! # Use a restriction file
//! replica presets > presets.toml
//! replica -c presets.toml sample
//! ```

use clap::Parser;
use replica::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // REPLICA_LOG_FORMAT=json switches to machine-parseable output
    let log_format = std::env::var("REPLICA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "replica=info,replica_core=warn".into());

    // Logs go to stderr so scripts on stdout stay clean
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Replica startup banner to stderr.
fn print_banner() {
    eprintln!(
        "replica v{} - deterministic object graph snapshots",
        env!("CARGO_PKG_VERSION")
    );
}
