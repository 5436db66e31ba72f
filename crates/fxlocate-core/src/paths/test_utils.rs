//! Process environment fixtures.
//!
//! `ProcessEnvironment` is the only environment adapter with shared state.
//! Tests that resolve against it hold `ENV_LOCK` and pin the override
//! variables with a [`ScopedVar`] for the duration of the test.

use std::env;
use std::sync::Mutex;

/// Held by every test that reads or writes the process environment.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A process variable pinned to a value until the guard drops.
///
/// ```ignore
/// let _lock = ENV_LOCK.lock().unwrap();
/// let _version = ScopedVar::set("COMPLUS_Version", "v4.0.30319");
/// let _root = ScopedVar::unset("COMPLUS_InstallRoot");
/// ```
pub struct ScopedVar {
    name: String,
    saved: Option<String>,
}

impl ScopedVar {
    pub fn set(name: &str, value: &str) -> Self {
        Self::pin(name, Some(value))
    }

    pub fn unset(name: &str) -> Self {
        Self::pin(name, None)
    }

    fn pin(name: &str, value: Option<&str>) -> Self {
        let saved = env::var(name).ok();
        write_var(name, value);
        Self {
            name: name.to_string(),
            saved,
        }
    }
}

impl Drop for ScopedVar {
    fn drop(&mut self) {
        write_var(&self.name, self.saved.as_deref());
    }
}

// Callers serialize on ENV_LOCK.
#[allow(unsafe_code)]
fn write_var(name: &str, value: Option<&str>) {
    match value {
        Some(value) => unsafe { env::set_var(name, value) },
        None => unsafe { env::remove_var(name) },
    }
}
