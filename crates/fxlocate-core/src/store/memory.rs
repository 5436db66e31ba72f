//! In-memory configuration store.
//!
//! Mirrors the registry semantics the resolver relies on: case-insensitive key
//! paths and value names, byte-budgeted queries, and per-key access denial.
//! Snapshots can be loaded from JSON so a host without a registry can still
//! answer lookups.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;
use crate::ports::{ConfigKey, ConfigStore, ConfigValue, RootKey};

/// Errors raised while loading a store snapshot from disk.
#[derive(Debug, Error)]
pub enum StoreFileError {
    #[error("Failed to read store file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid store file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One key and the values stored directly under it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoryKeyEntry {
    pub values: BTreeMap<String, ConfigValue>,
    /// Simulates an ACL that refuses read access.
    pub access_denied: bool,
}

#[derive(Debug, Default)]
struct HandleCounters {
    opened: AtomicUsize,
    live: AtomicUsize,
}

/// A configuration store held entirely in memory.
///
/// Clones share handle counters, so a clone handed to a resolver can be
/// inspected afterwards through the original.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryConfigStore {
    hives: BTreeMap<RootKey, BTreeMap<String, MemoryKeyEntry>>,
    #[serde(skip)]
    counters: Arc<HandleCounters>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, StoreFileError> {
        let contents = fs::read_to_string(path).map_err(|source| StoreFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| StoreFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Ensure a key exists, creating it empty if needed.
    #[must_use]
    pub fn with_key(mut self, root: RootKey, key_path: &str) -> Self {
        self.entry_mut(root, key_path);
        self
    }

    /// Store a value of any kind.
    #[must_use]
    pub fn with_value(
        mut self,
        root: RootKey,
        key_path: &str,
        value_name: &str,
        value: ConfigValue,
    ) -> Self {
        let entry = self.entry_mut(root, key_path);
        let existing = entry
            .values
            .keys()
            .find(|name| same_name(name, value_name))
            .cloned();
        if let Some(name) = existing {
            entry.values.remove(&name);
        }
        entry.values.insert(value_name.to_string(), value);
        self
    }

    /// Store a plain string value.
    #[must_use]
    pub fn with_string(self, root: RootKey, key_path: &str, value_name: &str, value: &str) -> Self {
        self.with_value(
            root,
            key_path,
            value_name,
            ConfigValue::String(value.to_string()),
        )
    }

    /// Make every open of `key_path` fail with `AccessDenied`.
    #[must_use]
    pub fn deny_access(mut self, root: RootKey, key_path: &str) -> Self {
        self.entry_mut(root, key_path).access_denied = true;
        self
    }

    /// Total number of successful key opens since creation.
    pub fn opened_count(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Number of key handles currently open.
    pub fn open_handles(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    fn entry_mut(&mut self, root: RootKey, key_path: &str) -> &mut MemoryKeyEntry {
        let keys = self.hives.entry(root).or_default();
        let normalized = normalize_key(key_path);
        let existing = keys
            .keys()
            .find(|stored| normalize_key(stored) == normalized)
            .cloned();
        let name = existing.unwrap_or_else(|| key_path.trim_matches('\\').to_string());
        keys.entry(name).or_default()
    }

    fn find(&self, root: RootKey, key_path: &str) -> Option<&MemoryKeyEntry> {
        let normalized = normalize_key(key_path);
        self.hives
            .get(&root)?
            .iter()
            .find(|(stored, _)| normalize_key(stored) == normalized)
            .map(|(_, entry)| entry)
    }
}

fn normalize_key(key_path: &str) -> String {
    key_path.trim_matches('\\').to_lowercase()
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl ConfigStore for MemoryConfigStore {
    fn open_key(&self, root: RootKey, key_path: &str) -> Result<Box<dyn ConfigKey>, StoreError> {
        let entry = self.find(root, key_path).ok_or(StoreError::NotFound)?;
        if entry.access_denied {
            return Err(StoreError::AccessDenied);
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryKey {
            values: entry.values.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MemoryKey {
    values: BTreeMap<String, ConfigValue>,
    counters: Arc<HandleCounters>,
}

impl ConfigKey for MemoryKey {
    fn query_value(&self, value_name: &str, max_bytes: u32) -> Result<ConfigValue, StoreError> {
        let value = self
            .values
            .iter()
            .find(|(name, _)| same_name(name, value_name))
            .map(|(_, value)| value)
            .ok_or(StoreError::NotFound)?;

        let required = value.stored_size();
        if required > max_bytes as usize {
            return Err(StoreError::MoreData {
                required_bytes: u32::try_from(required).unwrap_or(u32::MAX),
                available_bytes: max_bytes,
            });
        }

        Ok(value.clone())
    }
}

impl Drop for MemoryKey {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
