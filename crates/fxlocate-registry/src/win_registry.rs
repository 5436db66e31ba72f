//! `ConfigStore` over the Win32 registry.
//!
//! Keys are opened with `KEY_READ` and closed when the handle is dropped.
//! Queries probe the value size first so an oversized value is reported as
//! `MoreData` without allocating the caller's full byte budget.

#![allow(unsafe_code)]

use fxlocate_core::{ConfigKey, ConfigStore, ConfigValue, RootKey, StoreError, ValueKind};
use tracing::trace;
use windows::Win32::Foundation::{ERROR_MORE_DATA, ERROR_SUCCESS, WIN32_ERROR};
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, REG_VALUE_TYPE, RegCloseKey,
    RegOpenKeyExW, RegQueryValueExW,
};
use windows::core::PCWSTR;

/// The live Windows registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub const fn new() -> Self {
        Self
    }
}

const fn predefined(root: RootKey) -> HKEY {
    match root {
        RootKey::LocalMachine => HKEY_LOCAL_MACHINE,
        RootKey::CurrentUser => HKEY_CURRENT_USER,
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn status(err: WIN32_ERROR) -> StoreError {
    StoreError::from_code(err.0)
}

impl ConfigStore for WindowsRegistry {
    fn open_key(&self, root: RootKey, key_path: &str) -> Result<Box<dyn ConfigKey>, StoreError> {
        let sub_key = wide(key_path);
        let mut handle = HKEY::default();

        // SAFETY: `sub_key` is NUL-terminated and outlives the call; `handle`
        // is a valid out-pointer.
        let result = unsafe {
            RegOpenKeyExW(
                predefined(root),
                PCWSTR::from_raw(sub_key.as_ptr()),
                0,
                KEY_READ,
                &mut handle,
            )
        };
        if result != ERROR_SUCCESS {
            return Err(status(result));
        }

        trace!(%root, key_path, "Opened registry key");
        Ok(Box::new(RegistryKey { handle }))
    }
}

/// An open registry key, closed on drop.
struct RegistryKey {
    handle: HKEY,
}

// SAFETY: registry handles are process-wide and may be used and closed from
// any thread.
unsafe impl Send for RegistryKey {}

impl ConfigKey for RegistryKey {
    fn query_value(&self, value_name: &str, max_bytes: u32) -> Result<ConfigValue, StoreError> {
        let wide_name = wide(value_name);
        let name = PCWSTR::from_raw(wide_name.as_ptr());
        let mut kind = REG_VALUE_TYPE::default();
        let mut size = 0u32;

        // SAFETY: size probe with no data buffer; all out-pointers are valid.
        let result = unsafe {
            RegQueryValueExW(
                self.handle,
                name,
                None,
                Some(&raw mut kind),
                None,
                Some(&raw mut size),
            )
        };
        if result != ERROR_SUCCESS {
            return Err(status(result));
        }
        if size > max_bytes {
            return Err(StoreError::MoreData {
                required_bytes: size,
                available_bytes: max_bytes,
            });
        }

        let mut data = vec![0u8; size as usize];
        // SAFETY: `data` holds exactly `size` bytes.
        let result = unsafe {
            RegQueryValueExW(
                self.handle,
                name,
                None,
                Some(&raw mut kind),
                Some(data.as_mut_ptr()),
                Some(&raw mut size),
            )
        };
        if result == ERROR_MORE_DATA {
            // The value grew between the probe and the read.
            return Err(StoreError::MoreData {
                required_bytes: size,
                available_bytes: max_bytes,
            });
        }
        if result != ERROR_SUCCESS {
            return Err(status(result));
        }

        data.truncate(size as usize);
        Ok(ConfigValue::from_raw(ValueKind::from_code(kind.0), &data))
    }
}

impl Drop for RegistryKey {
    fn drop(&mut self) {
        // SAFETY: `handle` came from a successful RegOpenKeyExW and is closed once.
        let _ = unsafe { RegCloseKey(self.handle) };
    }
}
