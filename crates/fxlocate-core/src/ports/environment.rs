//! Environment variable port.
//!
//! The resolver never touches `std::env` directly so override handling can be
//! exercised without mutating the process environment.

use std::collections::HashMap;
use std::env;

/// Port for reading environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    /// Return the variable's value, or `None` when it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Read a variable, treating an empty value as not set.
///
/// A zero-length value cannot be told apart from an unset one, so an override
/// deliberately set to the empty string is ignored.
pub fn non_empty_var(env: &dyn Environment, name: &str) -> Option<String> {
    env.var(name).filter(|value| !value.is_empty())
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

/// A fixed set of variables, for tests and embedding hosts that build the
/// environment themselves.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, ScopedVar};

    #[test]
    fn empty_value_counts_as_unset() {
        let env = MapEnvironment::new().with("EMPTY", "").with("SET", "v4.0");
        assert_eq!(env.var("EMPTY"), Some(String::new()));
        assert_eq!(non_empty_var(&env, "EMPTY"), None);
        assert_eq!(non_empty_var(&env, "SET").as_deref(), Some("v4.0"));
        assert_eq!(non_empty_var(&env, "MISSING"), None);
    }

    #[test]
    fn process_environment_reads_live_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = ScopedVar::set("FXLOCATE_TEST_PROCESS_ENV", "D:\\Runtime");

        let value = ProcessEnvironment.var("FXLOCATE_TEST_PROCESS_ENV");
        assert_eq!(value.as_deref(), Some("D:\\Runtime"));
    }

    #[test]
    fn process_environment_reports_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = ScopedVar::unset("FXLOCATE_TEST_PROCESS_ENV");

        assert_eq!(ProcessEnvironment.var("FXLOCATE_TEST_PROCESS_ENV"), None);
    }
}
