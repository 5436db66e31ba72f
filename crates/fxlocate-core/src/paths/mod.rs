//! Install path lookup.
//!
//! This module provides the two lookup operations:
//! - Typed string reads from the configuration store
//! - Install directory resolution with environment overrides
//!
//! # Design
//!
//! - Returns owned values and `LookupError`; nothing is truncated silently
//! - The platform is reached only through the ports in `crate::ports`
//! - Paths are composed Windows-style on every host

mod buffer;
mod reader;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use buffer::PathBuffer;
pub use reader::{MAX_READ_CHARS, read_config_string};
pub use resolver::{
    InstallPathResolver, InstallRootSource, ResolvedInstallPath, resolve_install_path,
};
