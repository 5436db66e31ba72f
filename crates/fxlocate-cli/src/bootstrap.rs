//! Composition root: wires the store, environment and settings together.
//!
//! Settings are taken from, in order:
//! 1. `--settings` / `FXLOCATE_SETTINGS`
//! 2. `<config dir>/fxlocate/settings.json` when it exists
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fxlocate_core::{
    ConfigStore, Environment, InstallPathResolver, MemoryConfigStore, ProcessEnvironment,
    ResolverSettings, validate_settings,
};
use tracing::debug;

use crate::error::CliError;

/// Inputs for [`bootstrap`], usually taken from the parsed [`crate::Cli`].
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub store_file: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
}

/// Everything a handler needs.
#[derive(Clone)]
pub struct CliContext {
    pub store: Arc<dyn ConfigStore>,
    pub env: Arc<dyn Environment>,
    pub settings: ResolverSettings,
}

impl CliContext {
    pub fn resolver(&self) -> InstallPathResolver {
        InstallPathResolver::with_settings(
            Arc::clone(&self.store),
            Arc::clone(&self.env),
            self.settings.clone(),
        )
    }
}

/// Build the context for this invocation.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    let store: Arc<dyn ConfigStore> = match &config.store_file {
        Some(path) => {
            debug!(path = %path.display(), "Loading store snapshot");
            let store = MemoryConfigStore::load(path)
                .map_err(|e| CliError::Config(e.to_string()))?;
            Arc::new(store)
        }
        None => fxlocate_registry::system_store(),
    };

    let settings = match settings_path(config.settings_file.as_deref()) {
        Some(path) => load_settings(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ResolverSettings::default(),
    };

    Ok(CliContext {
        store,
        env: Arc::new(ProcessEnvironment),
        settings,
    })
}

fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let default = dirs::config_dir()?.join("fxlocate").join("settings.json");
    default.is_file().then_some(default)
}

/// Read and validate a settings file.
pub fn load_settings(path: &Path) -> Result<ResolverSettings, CliError> {
    let contents = fs::read_to_string(path).map_err(|e| CliError::Config(e.to_string()))?;
    let settings: ResolverSettings =
        serde_json::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
    validate_settings(&settings).map_err(|e| CliError::Config(e.to_string()))?;
    debug!(path = %path.display(), "Loaded resolver settings");
    Ok(settings)
}
