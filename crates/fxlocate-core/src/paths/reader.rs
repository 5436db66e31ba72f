//! Typed string reads from the configuration store.

use tracing::debug;

use crate::error::LookupError;
use crate::ports::{ConfigStore, ConfigValue, RootKey};

/// Largest capacity, in characters, whose byte size the store can be asked for.
pub const MAX_READ_CHARS: usize = i32::MAX as usize;

/// Read a single string value from `key_path` under `root`.
///
/// `max_chars` is the caller's capacity in UTF-16 characters; the store is
/// offered `max_chars * 2` bytes. Anything but a plain string value
/// (`REG_SZ`) is rejected with `UnsupportedValueType`, including expandable
/// strings. The key handle is released before this returns, whatever the
/// outcome.
///
/// A value that fills the capacity exactly may have been stored without a
/// terminator; the returned string is complete but leaves no headroom.
pub fn read_config_string(
    store: &dyn ConfigStore,
    root: RootKey,
    key_path: &str,
    value_name: &str,
    max_chars: usize,
) -> Result<String, LookupError> {
    if max_chars > MAX_READ_CHARS {
        return Err(LookupError::InvalidParameter { max_chars });
    }
    #[allow(clippy::cast_possible_truncation)]
    let max_bytes = (max_chars * 2) as u32;

    let key = store.open_key(root, key_path).inspect_err(|err| {
        debug!(%root, key_path, error = %err, "Failed to open configuration key");
    })?;

    let value = key.query_value(value_name, max_bytes).inspect_err(|err| {
        debug!(%root, key_path, value_name, error = %err, "Failed to query configuration value");
    })?;
    drop(key);

    match value {
        ConfigValue::String(s) => Ok(s),
        other => Err(LookupError::UnsupportedValueType {
            key_path: key_path.to_string(),
            value_name: value_name.to_string(),
            found: other.kind(),
        }),
    }
}
