//! Resolver settings and validation.
//!
//! The defaults reproduce the private-runtime convention of the .NET
//! Framework: `COMPLUS_Version` / `COMPLUS_InstallRoot` in the environment and
//! the two machine-wide registry locations written by the framework installer.

use serde::{Deserialize, Serialize};

use crate::ports::RootKey;

/// Environment variable naming a pinned runtime version.
pub const VERSION_OVERRIDE_VAR: &str = "COMPLUS_Version";

/// Environment variable naming an alternate runtime install root.
pub const ROOT_OVERRIDE_VAR: &str = "COMPLUS_InstallRoot";

/// Key holding the framework install root, used with a version override.
pub const INSTALL_ROOT_KEY: &str = r"Software\Microsoft\.NETFramework";

/// Value under [`INSTALL_ROOT_KEY`].
pub const INSTALL_ROOT_VALUE: &str = "InstallRoot";

/// Key holding the full, version-specific install path.
pub const INSTALL_PATH_KEY: &str = r"Software\Microsoft\Net Framework Setup\NDP\v4\Client";

/// Value under [`INSTALL_PATH_KEY`].
pub const INSTALL_PATH_VALUE: &str = "InstallPath";

/// Product subdirectory appended to every resolved root.
pub const PRODUCT_SUBDIR: &str = "WPF";

/// Smallest buffer, in characters, the resolver accepts (`MAX_PATH`).
pub const MIN_PATH_CAPACITY: usize = 260;

/// Names and locations consulted during install path resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverSettings {
    /// Variable that pins the runtime version and enables the override tier.
    pub version_override_var: String,

    /// Variable that replaces the registered install root.
    pub root_override_var: String,

    /// Hierarchy both registry locations live under.
    pub hive: RootKey,

    pub install_root_key: String,
    pub install_root_value: String,

    pub install_path_key: String,
    pub install_path_value: String,

    /// Trailing directory appended in every successful resolution.
    pub product_subdir: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            version_override_var: VERSION_OVERRIDE_VAR.to_string(),
            root_override_var: ROOT_OVERRIDE_VAR.to_string(),
            hive: RootKey::LocalMachine,
            install_root_key: INSTALL_ROOT_KEY.to_string(),
            install_root_value: INSTALL_ROOT_VALUE.to_string(),
            install_path_key: INSTALL_PATH_KEY.to_string(),
            install_path_value: INSTALL_PATH_VALUE.to_string(),
            product_subdir: PRODUCT_SUBDIR.to_string(),
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Setting '{0}' cannot be empty")]
    Empty(&'static str),

    #[error("Setting '{field}' must not start with a separator: {value}")]
    LeadingSeparator { field: &'static str, value: String },

    #[error("Product subdirectory must be a single path segment, got {0}")]
    InvalidSubdir(String),
}

/// Validate resolver settings.
pub fn validate_settings(settings: &ResolverSettings) -> Result<(), SettingsError> {
    let required = [
        ("version_override_var", &settings.version_override_var),
        ("root_override_var", &settings.root_override_var),
        ("install_root_key", &settings.install_root_key),
        ("install_root_value", &settings.install_root_value),
        ("install_path_key", &settings.install_path_key),
        ("install_path_value", &settings.install_path_value),
        ("product_subdir", &settings.product_subdir),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(SettingsError::Empty(field));
        }
    }

    for (field, value) in [
        ("install_root_key", &settings.install_root_key),
        ("install_path_key", &settings.install_path_key),
    ] {
        if value.starts_with(['\\', '/']) {
            return Err(SettingsError::LeadingSeparator {
                field,
                value: value.clone(),
            });
        }
    }

    if settings.product_subdir.contains(['\\', '/']) {
        return Err(SettingsError::InvalidSubdir(settings.product_subdir.clone()));
    }

    Ok(())
}
