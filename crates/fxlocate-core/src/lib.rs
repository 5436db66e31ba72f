//! Core lookup logic for fxlocate.
//!
//! Resolves the install directory of the WPF assemblies shipped with the .NET
//! Framework. Environment overrides (`COMPLUS_Version`, `COMPLUS_InstallRoot`)
//! take precedence over the machine-wide registry, and the `WPF` subdirectory
//! is appended to whichever root wins.
//!
//! The platform is reached only through [`ports::ConfigStore`] and
//! [`ports::Environment`]; the Windows registry adapter lives in
//! `fxlocate-registry`.
//!
//! ```
//! use std::sync::Arc;
//! use fxlocate_core::{MapEnvironment, MemoryConfigStore, RootKey, resolve_install_path};
//!
//! let store = MemoryConfigStore::new().with_string(
//!     RootKey::LocalMachine,
//!     r"Software\Microsoft\Net Framework Setup\NDP\v4\Client",
//!     "InstallPath",
//!     r"C:\Program Files\Reference Assemblies",
//! );
//! let resolved = resolve_install_path(Arc::new(store), Arc::new(MapEnvironment::new()), 260)?;
//! assert_eq!(
//!     resolved.path.to_string_lossy(),
//!     r"C:\Program Files\Reference Assemblies\WPF"
//! );
//! # Ok::<(), fxlocate_core::LookupError>(())
//! ```

#![deny(unused_crate_dependencies)]

pub mod error;
pub mod paths;
pub mod ports;
pub mod settings;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{LookupError, StoreError};
pub use paths::{
    InstallPathResolver, InstallRootSource, MAX_READ_CHARS, PathBuffer, ResolvedInstallPath,
    read_config_string, resolve_install_path,
};
pub use ports::{
    ConfigKey, ConfigStore, ConfigValue, Environment, MapEnvironment, ProcessEnvironment,
    RootKey, ValueKind,
};
pub use settings::{MIN_PATH_CAPACITY, ResolverSettings, SettingsError, validate_settings};
pub use store::{MemoryConfigStore, StoreFileError};
