//! Read command handler.

use std::io::Write;

use anyhow::Result;
use fxlocate_core::{RootKey, read_config_string};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the read command: print one string value from the store.
pub fn execute(
    ctx: &CliContext,
    root: RootKey,
    key_path: &str,
    value_name: &str,
    max_chars: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let value = read_config_string(ctx.store.as_ref(), root, key_path, value_name, max_chars)
        .map_err(CliError::from)?;
    writeln!(out, "{value}").map_err(CliError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fxlocate_core::{
        ConfigValue, LookupError, MapEnvironment, MemoryConfigStore, ResolverSettings,
    };

    const KEY: &str = r"Software\Microsoft\.NETFramework";

    fn context(store: MemoryConfigStore) -> CliContext {
        CliContext {
            store: Arc::new(store),
            env: Arc::new(MapEnvironment::new()),
            settings: ResolverSettings::default(),
        }
    }

    #[test]
    fn test_prints_value() {
        let store = MemoryConfigStore::new().with_string(
            RootKey::CurrentUser,
            KEY,
            "InstallRoot",
            r"C:\Users\me\Framework",
        );
        let mut out = Vec::new();
        execute(&context(store), RootKey::CurrentUser, KEY, "InstallRoot", 260, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "C:\\Users\\me\\Framework\n");
    }

    #[test]
    fn test_rejects_dword() {
        let store = MemoryConfigStore::new().with_value(
            RootKey::LocalMachine,
            KEY,
            "Enable64Bit",
            ConfigValue::DWord(1),
        );
        let mut out = Vec::new();
        let err = execute(&context(store), RootKey::LocalMachine, KEY, "Enable64Bit", 260, &mut out)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Lookup(LookupError::UnsupportedValueType { .. }))
        ));
    }
}
