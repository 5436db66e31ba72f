//! Configuration store port.
//!
//! Abstracts a hierarchical, read-only key/value store such as the Windows
//! registry. Implementations live in adapters (e.g., `fxlocate-registry`);
//! the in-memory store in `crate::store` backs tests and non-Windows hosts.
//!
//! # Design Notes
//!
//! - Opening a key yields an owned handle; dropping it closes the key
//! - Queries take a byte budget so adapters can report `MoreData` the way the
//!   native API does
//! - Values are decoded into `ConfigValue`; callers decide which kinds they accept

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Top-level hierarchy inside the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RootKey {
    /// Machine-wide settings (`HKEY_LOCAL_MACHINE`).
    LocalMachine,
    /// Settings of the current user (`HKEY_CURRENT_USER`).
    CurrentUser,
}

impl fmt::Display for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalMachine => f.write_str("HKEY_LOCAL_MACHINE"),
            Self::CurrentUser => f.write_str("HKEY_CURRENT_USER"),
        }
    }
}

/// Type tag of a stored value, numbered like the registry `REG_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    ExpandString,
    Binary,
    DWord,
    MultiString,
    QWord,
    /// Any type the domain does not model, with its raw code.
    Other(u32),
}

impl ValueKind {
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::String,
            2 => Self::ExpandString,
            3 => Self::Binary,
            4 => Self::DWord,
            7 => Self::MultiString,
            11 => Self::QWord,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            Self::String => 1,
            Self::ExpandString => 2,
            Self::Binary => 3,
            Self::DWord => 4,
            Self::MultiString => 7,
            Self::QWord => 11,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("REG_SZ"),
            Self::ExpandString => f.write_str("REG_EXPAND_SZ"),
            Self::Binary => f.write_str("REG_BINARY"),
            Self::DWord => f.write_str("REG_DWORD"),
            Self::MultiString => f.write_str("REG_MULTI_SZ"),
            Self::QWord => f.write_str("REG_QWORD"),
            Self::Other(code) => write!(f, "type {code}"),
        }
    }
}

/// A decoded configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigValue {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    DWord(u32),
    QWord(u64),
    Binary(Vec<u8>),
    Raw { code: u32, data: Vec<u8> },
}

impl ConfigValue {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::ExpandString(_) => ValueKind::ExpandString,
            Self::MultiString(_) => ValueKind::MultiString,
            Self::DWord(_) => ValueKind::DWord,
            Self::QWord(_) => ValueKind::QWord,
            Self::Binary(_) => ValueKind::Binary,
            Self::Raw { code, .. } => ValueKind::Other(*code),
        }
    }

    /// Size in bytes the value occupies in the store.
    ///
    /// Strings are UTF-16 and include their terminator; a multi-string carries
    /// one extra terminator after the last entry.
    pub fn stored_size(&self) -> usize {
        match self {
            Self::String(s) | Self::ExpandString(s) => utf16_size(s),
            Self::MultiString(items) => items.iter().map(|s| utf16_size(s)).sum::<usize>() + 2,
            Self::DWord(_) => 4,
            Self::QWord(_) => 8,
            Self::Binary(data) | Self::Raw { data, .. } => data.len(),
        }
    }

    /// Decode raw bytes returned by a native query.
    ///
    /// String data is little-endian UTF-16 and ends at the first terminator;
    /// anything stored past it is ignored. A missing terminator is tolerated.
    /// Integer kinds with the wrong length are kept as `Raw` so nothing is
    /// silently reinterpreted.
    pub fn from_raw(kind: ValueKind, data: &[u8]) -> Self {
        match kind {
            ValueKind::String => Self::String(decode_utf16(data)),
            ValueKind::ExpandString => Self::ExpandString(decode_utf16(data)),
            ValueKind::MultiString => {
                let joined = decode_utf16_units(data);
                let items = joined
                    .split(|unit| *unit == 0)
                    .filter(|item| !item.is_empty())
                    .map(String::from_utf16_lossy)
                    .collect();
                Self::MultiString(items)
            }
            ValueKind::DWord => match <[u8; 4]>::try_from(data) {
                Ok(bytes) => Self::DWord(u32::from_le_bytes(bytes)),
                Err(_) => Self::Raw {
                    code: kind.code(),
                    data: data.to_vec(),
                },
            },
            ValueKind::QWord => match <[u8; 8]>::try_from(data) {
                Ok(bytes) => Self::QWord(u64::from_le_bytes(bytes)),
                Err(_) => Self::Raw {
                    code: kind.code(),
                    data: data.to_vec(),
                },
            },
            ValueKind::Binary => Self::Binary(data.to_vec()),
            ValueKind::Other(code) => Self::Raw {
                code,
                data: data.to_vec(),
            },
        }
    }
}

fn utf16_size(s: &str) -> usize {
    (s.encode_utf16().count() + 1) * 2
}

fn decode_utf16_units(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

fn decode_utf16(data: &[u8]) -> String {
    let units = decode_utf16_units(data);
    let end = units.iter().position(|unit| *unit == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// An opened configuration key. Dropping the handle closes the key.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigKey: Send {
    /// Query a named value, offering at most `max_bytes` bytes for its data.
    ///
    /// Returns `StoreError::MoreData` when the value does not fit.
    fn query_value(&self, value_name: &str, max_bytes: u32) -> Result<ConfigValue, StoreError>;
}

/// Port for a hierarchical, read-only configuration store.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Open `key_path` under `root` for read access.
    fn open_key(&self, root: RootKey, key_path: &str) -> Result<Box<dyn ConfigKey>, StoreError>;
}
