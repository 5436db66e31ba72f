//! Lookup error types.
//!
//! `StoreError` is the boundary where native configuration-store status codes
//! enter the domain. Everything above it works with `LookupError`, a closed set
//! of failure kinds that can still be rendered back to the Win32/HRESULT codes
//! a native caller would expect.

use thiserror::Error;

use crate::ports::ValueKind;

/// Win32 `ERROR_FILE_NOT_FOUND`.
pub const ERROR_FILE_NOT_FOUND: u32 = 2;
/// Win32 `ERROR_PATH_NOT_FOUND`.
pub const ERROR_PATH_NOT_FOUND: u32 = 3;
/// Win32 `ERROR_ACCESS_DENIED`.
pub const ERROR_ACCESS_DENIED: u32 = 5;
/// Win32 `ERROR_INVALID_PARAMETER`.
pub const ERROR_INVALID_PARAMETER: u32 = 87;
/// Win32 `ERROR_MORE_DATA`.
pub const ERROR_MORE_DATA: u32 = 234;
/// Win32 `ERROR_UNSUPPORTED_TYPE`.
pub const ERROR_UNSUPPORTED_TYPE: u32 = 1630;

/// `E_OUTOFMEMORY`, reported for every path buffer exhaustion.
#[allow(clippy::cast_possible_wrap)]
pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;

/// Errors surfaced by a configuration store while opening or querying a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The key or value does not exist.
    #[error("configuration key or value not found")]
    NotFound,

    /// A component of the key path does not exist.
    #[error("configuration key path not found")]
    PathNotFound,

    /// The caller may not open the key for reading.
    #[error("access to the configuration key was denied")]
    AccessDenied,

    /// The value does not fit in the requested number of bytes.
    #[error("value needs {required_bytes} bytes but only {available_bytes} were offered")]
    MoreData {
        required_bytes: u32,
        available_bytes: u32,
    },

    /// Any other native status code, kept verbatim.
    #[error("configuration store failed with status {0}")]
    Platform(u32),
}

impl StoreError {
    /// Map a native Win32 status code into the closed set.
    ///
    /// `ERROR_MORE_DATA` carries no sizes on this path; adapters that know them
    /// should build `MoreData` directly.
    pub const fn from_code(code: u32) -> Self {
        match code {
            ERROR_FILE_NOT_FOUND => Self::NotFound,
            ERROR_PATH_NOT_FOUND => Self::PathNotFound,
            ERROR_ACCESS_DENIED => Self::AccessDenied,
            ERROR_MORE_DATA => Self::MoreData {
                required_bytes: 0,
                available_bytes: 0,
            },
            other => Self::Platform(other),
        }
    }

    /// The Win32 status code for this error.
    pub const fn code(&self) -> u32 {
        match self {
            Self::NotFound => ERROR_FILE_NOT_FOUND,
            Self::PathNotFound => ERROR_PATH_NOT_FOUND,
            Self::AccessDenied => ERROR_ACCESS_DENIED,
            Self::MoreData { .. } => ERROR_MORE_DATA,
            Self::Platform(code) => *code,
        }
    }
}

/// Errors that can occur while reading configuration values or resolving the
/// install path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The requested capacity cannot be expressed as a byte count for the store.
    #[error("buffer capacity of {max_chars} characters exceeds the supported maximum")]
    InvalidParameter { max_chars: usize },

    /// The configuration store rejected the open or the query.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The value exists but is not a plain string.
    #[error("value '{value_name}' under '{key_path}' has unsupported type {found}")]
    UnsupportedValueType {
        key_path: String,
        value_name: String,
        found: ValueKind,
    },

    /// The caller's buffer is below the minimum needed for path composition.
    #[error("path buffer of {capacity} characters is below the minimum of {minimum}")]
    BufferTooSmall { capacity: usize, minimum: usize },

    /// Seeding or appending to the path buffer would overflow it.
    #[error("path needs {required} characters but the buffer holds {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
}

impl LookupError {
    /// Whether this error belongs to the out-of-memory class.
    pub const fn is_out_of_memory(&self) -> bool {
        matches!(
            self,
            Self::BufferTooSmall { .. } | Self::CapacityExceeded { .. }
        )
    }

    /// The Win32 status code, for errors that have one.
    pub const fn win32_code(&self) -> Option<u32> {
        match self {
            Self::InvalidParameter { .. } => Some(ERROR_INVALID_PARAMETER),
            Self::Store(err) => Some(err.code()),
            Self::UnsupportedValueType { .. } => Some(ERROR_UNSUPPORTED_TYPE),
            Self::BufferTooSmall { .. } | Self::CapacityExceeded { .. } => None,
        }
    }

    /// The HRESULT a native caller would have received.
    pub const fn hresult(&self) -> i32 {
        match self.win32_code() {
            Some(code) => hresult_from_win32(code),
            None => E_OUTOFMEMORY,
        }
    }
}

/// Equivalent of the `HRESULT_FROM_WIN32` macro.
#[allow(clippy::cast_possible_wrap)]
pub const fn hresult_from_win32(code: u32) -> i32 {
    if code as i32 <= 0 {
        code as i32
    } else {
        ((code & 0x0000_FFFF) | 0x8007_0000) as i32
    }
}
