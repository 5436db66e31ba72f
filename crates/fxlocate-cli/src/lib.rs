//! Diagnostic CLI for install path resolution.
//!
//! `fxlocate resolve` runs the same resolver a host component would, against
//! the system registry or a JSON snapshot, and reports the winning tier.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

use std::io::Write;

use anyhow::Result;

// Used by main.rs binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use error::CliError;
pub use parser::{Cli, Commands, Hive};

/// Dispatch a parsed command against an already built context.
pub fn run(cli: &Cli, ctx: &CliContext, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Resolve { max_chars, explain } => {
            handlers::resolve::execute(ctx, *max_chars, *explain, out)
        }
        Commands::Read {
            key_path,
            value_name,
            hive,
            max_chars,
        } => handlers::read::execute(ctx, (*hive).into(), key_path, value_name, *max_chars, out),
    }
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            store_file: cli.store.clone(),
            settings_file: cli.settings.clone(),
        }
    }
}
