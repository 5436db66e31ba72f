//! Install path resolution.
//!
//! Resolution order:
//! 1. `COMPLUS_Version` set: the root comes from `COMPLUS_InstallRoot`, or
//!    from the registered `InstallRoot` when that variable is unset, and the
//!    version is appended as a segment
//! 2. `COMPLUS_Version` unset: the registered, already version-specific
//!    `InstallPath` is the root
//!
//! The product subdirectory is appended in every case. Empty variables count
//! as unset.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::buffer::PathBuffer;
use super::reader::read_config_string;
use crate::error::LookupError;
use crate::ports::{ConfigStore, Environment, non_empty_var};
use crate::settings::{MIN_PATH_CAPACITY, ResolverSettings};

/// Which tier supplied the install root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallRootSource {
    /// Both override variables were set.
    EnvironmentOverride,
    /// Version override set; root read from the registered `InstallRoot`.
    RegisteredInstallRoot,
    /// No override; root read from the registered `InstallPath`.
    RegisteredInstallPath,
}

impl fmt::Display for InstallRootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentOverride => f.write_str("environment"),
            Self::RegisteredInstallRoot => f.write_str("registered install root"),
            Self::RegisteredInstallPath => f.write_str("registered install path"),
        }
    }
}

/// A successfully resolved install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstallPath {
    /// `<root>[\<version>]\<product subdir>`
    pub path: PathBuf,
    /// How the root was determined.
    pub source: InstallRootSource,
    /// The pinned version segment, when the override tier was taken.
    pub version: Option<String>,
}

impl fmt::Display for ResolvedInstallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "path = {}", self.path.display())?;
        writeln!(f, "source = {}", self.source)?;
        write!(f, "version = {}", self.version.as_deref().unwrap_or("-"))
    }
}

/// Resolves the product's install directory from the environment and the
/// configuration store.
///
/// Holds no mutable state; one resolver can serve concurrent callers.
#[derive(Clone)]
pub struct InstallPathResolver {
    store: Arc<dyn ConfigStore>,
    env: Arc<dyn Environment>,
    settings: ResolverSettings,
}

impl InstallPathResolver {
    /// Create a resolver with the default variable names and registry locations.
    pub fn new(store: Arc<dyn ConfigStore>, env: Arc<dyn Environment>) -> Self {
        Self::with_settings(store, env, ResolverSettings::default())
    }

    pub fn with_settings(
        store: Arc<dyn ConfigStore>,
        env: Arc<dyn Environment>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            env,
            settings,
        }
    }

    /// Resolve the install directory into a buffer of `max_chars` characters.
    ///
    /// Fails with `BufferTooSmall` before reading anything when `max_chars`
    /// is below [`MIN_PATH_CAPACITY`]. Every later failure is returned as soon
    /// as it happens; no tier is retried.
    pub fn resolve(&self, max_chars: usize) -> Result<ResolvedInstallPath, LookupError> {
        if max_chars < MIN_PATH_CAPACITY {
            return Err(LookupError::BufferTooSmall {
                capacity: max_chars,
                minimum: MIN_PATH_CAPACITY,
            });
        }

        let settings = &self.settings;
        let version = non_empty_var(self.env.as_ref(), &settings.version_override_var);

        let (mut buffer, source) = match &version {
            Some(version) => {
                let (mut buffer, source) =
                    match non_empty_var(self.env.as_ref(), &settings.root_override_var) {
                        Some(root) => {
                            debug!(
                                var = %settings.root_override_var,
                                root = %root,
                                "Using install root override"
                            );
                            (
                                PathBuffer::new(&root, max_chars)?,
                                InstallRootSource::EnvironmentOverride,
                            )
                        }
                        None => {
                            let root = read_config_string(
                                self.store.as_ref(),
                                settings.hive,
                                &settings.install_root_key,
                                &settings.install_root_value,
                                max_chars,
                            )?;
                            debug!(root = %root, "Using registered install root");
                            (
                                PathBuffer::new(&root, max_chars)?,
                                InstallRootSource::RegisteredInstallRoot,
                            )
                        }
                    };
                debug!(version = %version, "Appending pinned runtime version");
                buffer.append(version)?;
                (buffer, source)
            }
            None => {
                let root = read_config_string(
                    self.store.as_ref(),
                    settings.hive,
                    &settings.install_path_key,
                    &settings.install_path_value,
                    max_chars,
                )?;
                debug!(root = %root, "Using registered install path");
                (
                    PathBuffer::new(&root, max_chars)?,
                    InstallRootSource::RegisteredInstallPath,
                )
            }
        };

        buffer.append(&settings.product_subdir)?;

        Ok(ResolvedInstallPath {
            path: PathBuf::from(buffer.into_string()),
            source,
            version,
        })
    }
}

/// Resolve the install directory with the default settings.
pub fn resolve_install_path(
    store: Arc<dyn ConfigStore>,
    env: Arc<dyn Environment>,
    max_chars: usize,
) -> Result<ResolvedInstallPath, LookupError> {
    InstallPathResolver::new(store, env).resolve(max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::paths::test_utils::{ENV_LOCK, ScopedVar};
    use crate::ports::{
        ConfigValue, MapEnvironment, MockConfigStore, MockEnvironment, ProcessEnvironment,
        RootKey, ValueKind,
    };
    use crate::settings::{
        INSTALL_PATH_KEY, INSTALL_PATH_VALUE, INSTALL_ROOT_KEY, INSTALL_ROOT_VALUE,
        ROOT_OVERRIDE_VAR, VERSION_OVERRIDE_VAR,
    };
    use crate::store::MemoryConfigStore;

    fn registered() -> MemoryConfigStore {
        MemoryConfigStore::new()
            .with_string(
                RootKey::LocalMachine,
                INSTALL_PATH_KEY,
                INSTALL_PATH_VALUE,
                r"C:\Program Files\Reference Assemblies",
            )
            .with_string(
                RootKey::LocalMachine,
                INSTALL_ROOT_KEY,
                INSTALL_ROOT_VALUE,
                r"C:\Windows\Microsoft.NET\Framework",
            )
    }

    fn resolve(
        store: &MemoryConfigStore,
        env: MapEnvironment,
    ) -> Result<ResolvedInstallPath, LookupError> {
        resolve_install_path(Arc::new(store.clone()), Arc::new(env), MIN_PATH_CAPACITY)
    }

    #[test]
    fn small_buffer_reads_nothing() {
        let mut env = MockEnvironment::new();
        env.expect_var().never();
        let mut store = MockConfigStore::new();
        store.expect_open_key().never();

        let resolver = InstallPathResolver::new(Arc::new(store), Arc::new(env));
        for max_chars in [0, 1, 100, MIN_PATH_CAPACITY - 1] {
            assert_eq!(
                resolver.resolve(max_chars),
                Err(LookupError::BufferTooSmall {
                    capacity: max_chars,
                    minimum: MIN_PATH_CAPACITY
                })
            );
        }
    }

    #[test]
    fn registered_install_path_without_override() {
        let store = registered();
        let resolved = resolve(&store, MapEnvironment::new()).unwrap();

        assert_eq!(
            resolved.path,
            PathBuf::from(r"C:\Program Files\Reference Assemblies\WPF")
        );
        assert_eq!(resolved.source, InstallRootSource::RegisteredInstallPath);
        assert_eq!(resolved.version, None);
        assert_eq!(store.opened_count(), 1);
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn empty_version_override_counts_as_unset() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "")
            .with(ROOT_OVERRIDE_VAR, r"D:\PrivateRuntime");
        let resolved = resolve(&registered(), env).unwrap();
        assert_eq!(resolved.source, InstallRootSource::RegisteredInstallPath);
    }

    #[test]
    fn full_override_ignores_store() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with(ROOT_OVERRIDE_VAR, r"D:\PrivateRuntime");
        let mut store = MockConfigStore::new();
        store.expect_open_key().never();

        let resolved = resolve_install_path(Arc::new(store), Arc::new(env), 260).unwrap();
        assert_eq!(resolved.path, PathBuf::from(r"D:\PrivateRuntime\v4.0.30319\WPF"));
        assert_eq!(resolved.source, InstallRootSource::EnvironmentOverride);
        assert_eq!(resolved.version.as_deref(), Some("v4.0.30319"));
    }

    #[test]
    fn override_root_trailing_separator_is_normalized() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with(ROOT_OVERRIDE_VAR, r"D:\PrivateRuntime\");
        let resolved = resolve(&MemoryConfigStore::new(), env).unwrap();
        assert_eq!(resolved.path, PathBuf::from(r"D:\PrivateRuntime\v4.0.30319\WPF"));
    }

    #[test]
    fn version_override_with_registered_root() {
        let env = MapEnvironment::new().with(VERSION_OVERRIDE_VAR, "v4.0.30319");
        let resolved = resolve(&registered(), env).unwrap();

        assert_eq!(
            resolved.path,
            PathBuf::from(r"C:\Windows\Microsoft.NET\Framework\v4.0.30319\WPF")
        );
        assert_eq!(resolved.source, InstallRootSource::RegisteredInstallRoot);
    }

    #[test]
    fn empty_root_override_falls_back_to_registry() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with(ROOT_OVERRIDE_VAR, "");
        let resolved = resolve(&registered(), env).unwrap();
        assert_eq!(resolved.source, InstallRootSource::RegisteredInstallRoot);
    }

    #[test]
    fn missing_install_path_key_is_not_found() {
        let result = resolve(&MemoryConfigStore::new(), MapEnvironment::new());
        assert_eq!(result, Err(LookupError::Store(StoreError::NotFound)));
    }

    #[test]
    fn missing_install_root_aborts_override_tier() {
        let store = MemoryConfigStore::new().with_string(
            RootKey::LocalMachine,
            INSTALL_PATH_KEY,
            INSTALL_PATH_VALUE,
            r"C:\Program Files\Reference Assemblies",
        );
        let env = MapEnvironment::new().with(VERSION_OVERRIDE_VAR, "v4.0.30319");

        // The InstallPath tier is never consulted as a second chance.
        assert_eq!(
            resolve(&store, env),
            Err(LookupError::Store(StoreError::NotFound))
        );
        assert_eq!(store.opened_count(), 0);
    }

    #[test]
    fn non_string_install_path_is_rejected() {
        let store = MemoryConfigStore::new().with_value(
            RootKey::LocalMachine,
            INSTALL_PATH_KEY,
            INSTALL_PATH_VALUE,
            ConfigValue::DWord(4),
        );
        let result = resolve(&store, MapEnvironment::new());
        assert!(matches!(result, Err(LookupError::UnsupportedValueType { .. })));
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn append_overflow_is_out_of_memory() {
        let long_root = format!(r"C:\{}", "a".repeat(MIN_PATH_CAPACITY - 6));
        let store = MemoryConfigStore::new().with_string(
            RootKey::LocalMachine,
            INSTALL_PATH_KEY,
            INSTALL_PATH_VALUE,
            &long_root,
        );

        let err = resolve(&store, MapEnvironment::new()).unwrap_err();
        assert!(err.is_out_of_memory());
        assert_eq!(
            err,
            LookupError::CapacityExceeded {
                required: MIN_PATH_CAPACITY + 2,
                capacity: MIN_PATH_CAPACITY
            }
        );
    }

    #[test]
    fn version_append_overflow_is_out_of_memory() {
        // 250 units of root leave 9 for `\<version>` plus the terminator.
        let root = format!(r"D:\{}", "x".repeat(247));
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with(ROOT_OVERRIDE_VAR, root);
        let mut store = MockConfigStore::new();
        store.expect_open_key().never();

        let err = resolve_install_path(Arc::new(store), Arc::new(env), MIN_PATH_CAPACITY)
            .unwrap_err();
        assert_eq!(
            err,
            LookupError::CapacityExceeded {
                required: 250 + 1 + 10 + 1,
                capacity: MIN_PATH_CAPACITY
            }
        );
        assert!(err.is_out_of_memory());
    }

    #[test]
    fn registered_value_stops_at_first_terminator() {
        let data: Vec<u8> = "C:\\Fw\0junk\0"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        let store = MemoryConfigStore::new().with_value(
            RootKey::LocalMachine,
            INSTALL_PATH_KEY,
            INSTALL_PATH_VALUE,
            ConfigValue::from_raw(ValueKind::String, &data),
        );

        let resolved = resolve(&store, MapEnvironment::new()).unwrap();
        assert_eq!(resolved.path, PathBuf::from(r"C:\Fw\WPF"));
    }

    #[test]
    fn oversized_override_root_is_out_of_memory() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with(ROOT_OVERRIDE_VAR, "x".repeat(MIN_PATH_CAPACITY));
        let err = resolve(&MemoryConfigStore::new(), env).unwrap_err();
        assert!(err.is_out_of_memory());
    }

    #[test]
    fn custom_settings_are_honored() {
        let settings = ResolverSettings {
            version_override_var: "FX_VERSION".into(),
            root_override_var: "FX_ROOT".into(),
            product_subdir: "Presentation".into(),
            ..ResolverSettings::default()
        };
        let env = MapEnvironment::new()
            .with("FX_VERSION", "v9")
            .with("FX_ROOT", r"E:\fx")
            .with(VERSION_OVERRIDE_VAR, "ignored");
        let resolver = InstallPathResolver::with_settings(
            Arc::new(MemoryConfigStore::new()),
            Arc::new(env),
            settings,
        );

        let resolved = resolver.resolve(MIN_PATH_CAPACITY).unwrap();
        assert_eq!(resolved.path, PathBuf::from(r"E:\fx\v9\Presentation"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let store = registered();
        let env = MapEnvironment::new().with(VERSION_OVERRIDE_VAR, "v4.0.30319");
        let resolver = InstallPathResolver::new(Arc::new(store.clone()), Arc::new(env));

        let first = resolver.resolve(MIN_PATH_CAPACITY).unwrap();
        let second = resolver.resolve(MIN_PATH_CAPACITY).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.opened_count(), 2);
    }

    #[test]
    fn reads_process_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _version = ScopedVar::set(VERSION_OVERRIDE_VAR, "v4.0.30319");
        let _root = ScopedVar::set(ROOT_OVERRIDE_VAR, r"D:\PrivateRuntime");

        let resolved = resolve_install_path(
            Arc::new(MemoryConfigStore::new()),
            Arc::new(ProcessEnvironment),
            MIN_PATH_CAPACITY,
        )
        .unwrap();
        assert_eq!(resolved.path, PathBuf::from(r"D:\PrivateRuntime\v4.0.30319\WPF"));
    }

    #[test]
    fn display_lists_source_and_version() {
        let resolved = ResolvedInstallPath {
            path: PathBuf::from(r"C:\Root\WPF"),
            source: InstallRootSource::RegisteredInstallPath,
            version: None,
        };
        let output = resolved.to_string();
        assert!(output.contains(r"path = C:\Root\WPF"));
        assert!(output.contains("source = registered install path"));
        assert!(output.contains("version = -"));
    }
}
