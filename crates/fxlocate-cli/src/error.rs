//! CLI-specific error types and exit code mapping.

use fxlocate_core::LookupError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolution or a store read failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Settings or store snapshot could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the result failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: Lookup failed (path could not be determined)
    /// - 74: EX_IOERR
    /// - 78: EX_CONFIG
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lookup(_) => 1,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }

    /// The HRESULT a native caller would have seen, for lookup failures.
    pub const fn hresult(&self) -> Option<i32> {
        match self {
            Self::Lookup(err) => Some(err.hresult()),
            Self::Config(_) | Self::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
