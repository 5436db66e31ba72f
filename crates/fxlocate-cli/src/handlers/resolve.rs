//! Resolve command handler.
//!
//! Prints the resolved install directory. With `--explain` it prints the
//! full resolution in `key = value` format instead, which is the quickest way
//! to see whether an override was picked up.

use std::io::Write;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the resolve command.
pub fn execute(
    ctx: &CliContext,
    max_chars: usize,
    explain: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let resolved = ctx.resolver().resolve(max_chars).map_err(CliError::from)?;

    if explain {
        writeln!(out, "{resolved}").map_err(CliError::from)?;
    } else {
        writeln!(out, "{}", resolved.path.display()).map_err(CliError::from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fxlocate_core::settings::{INSTALL_PATH_KEY, INSTALL_PATH_VALUE, VERSION_OVERRIDE_VAR};
    use fxlocate_core::{
        LookupError, MapEnvironment, MemoryConfigStore, ResolverSettings, RootKey, StoreError,
    };

    fn context(store: MemoryConfigStore, env: MapEnvironment) -> CliContext {
        CliContext {
            store: Arc::new(store),
            env: Arc::new(env),
            settings: ResolverSettings::default(),
        }
    }

    fn framework_store() -> MemoryConfigStore {
        MemoryConfigStore::new().with_string(
            RootKey::LocalMachine,
            INSTALL_PATH_KEY,
            INSTALL_PATH_VALUE,
            r"C:\Program Files\Reference Assemblies",
        )
    }

    #[test]
    fn test_prints_path() {
        let ctx = context(framework_store(), MapEnvironment::new());
        let mut out = Vec::new();
        execute(&ctx, 260, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "C:\\Program Files\\Reference Assemblies\\WPF\n"
        );
    }

    #[test]
    fn test_explain_lists_source() {
        let env = MapEnvironment::new()
            .with(VERSION_OVERRIDE_VAR, "v4.0.30319")
            .with("COMPLUS_InstallRoot", r"D:\PrivateRuntime");
        let ctx = context(MemoryConfigStore::new(), env);
        let mut out = Vec::new();
        execute(&ctx, 260, true, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains(r"path = D:\PrivateRuntime\v4.0.30319\WPF"));
        assert!(output.contains("source = environment"));
        assert!(output.contains("version = v4.0.30319"));
    }

    #[test]
    fn test_failure_surfaces_lookup_error() {
        let ctx = context(MemoryConfigStore::new(), MapEnvironment::new());
        let mut out = Vec::new();
        let err = execute(&ctx, 260, false, &mut out).unwrap_err();

        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(
            cli_err,
            CliError::Lookup(LookupError::Store(StoreError::NotFound))
        ));
        assert!(out.is_empty());
    }
}
