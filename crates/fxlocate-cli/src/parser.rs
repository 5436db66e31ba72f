//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fxlocate_core::{MIN_PATH_CAPACITY, RootKey};

/// Command-line interface for inspecting install path resolution.
#[derive(Parser)]
#[command(name = "fxlocate")]
#[command(about = "Locate the WPF install directory of the .NET Framework")]
#[command(version)]
pub struct Cli {
    /// Read configuration from a JSON store snapshot instead of the system registry
    #[arg(long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Resolver settings file (JSON)
    #[arg(long = "settings", env = "FXLOCATE_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the install directory
    Resolve {
        /// Buffer capacity in characters
        #[arg(long = "max-chars", default_value_t = MIN_PATH_CAPACITY)]
        max_chars: usize,

        /// Also print which tier supplied the root and the pinned version
        #[arg(long)]
        explain: bool,
    },

    /// Read one string value from the configuration store
    Read {
        /// Key path, e.g. "Software\Microsoft\.NETFramework"
        key_path: String,

        /// Value name, e.g. "InstallRoot"
        value_name: String,

        /// Top-level hierarchy to read from
        #[arg(long, value_enum, default_value_t = Hive::LocalMachine)]
        hive: Hive,

        /// Buffer capacity in characters
        #[arg(long = "max-chars", default_value_t = MIN_PATH_CAPACITY)]
        max_chars: usize,
    },
}

/// Command-line spelling of [`RootKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl From<Hive> for RootKey {
    fn from(hive: Hive) -> Self {
        match hive {
            Hive::LocalMachine => Self::LocalMachine,
            Hive::CurrentUser => Self::CurrentUser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::try_parse_from(["fxlocate", "resolve"]).unwrap();
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Resolve {
                max_chars: MIN_PATH_CAPACITY,
                explain: false
            }
        ));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fxlocate",
            "resolve",
            "--explain",
            "--store",
            "/tmp/store.json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn test_read_args() {
        let cli = Cli::try_parse_from([
            "fxlocate",
            "read",
            r"Software\Microsoft\.NETFramework",
            "InstallRoot",
            "--hive",
            "current-user",
        ])
        .unwrap();
        match cli.command {
            Commands::Read {
                key_path,
                value_name,
                hive,
                ..
            } => {
                assert_eq!(key_path, r"Software\Microsoft\.NETFramework");
                assert_eq!(value_name, "InstallRoot");
                assert_eq!(RootKey::from(hive), RootKey::CurrentUser);
            }
            Commands::Resolve { .. } => panic!("expected read"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_capacity() {
        assert!(Cli::try_parse_from(["fxlocate", "resolve", "--max-chars", "lots"]).is_err());
    }
}
