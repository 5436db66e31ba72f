//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the resolver expects from the platform.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `windows` types in any signature
//! - Read-only: no port can create or modify configuration entries
//! - Ports are `Send + Sync` so one resolver can serve concurrent callers

pub mod config_store;
pub mod environment;

pub use config_store::{ConfigKey, ConfigStore, ConfigValue, RootKey, ValueKind};
pub use environment::{Environment, MapEnvironment, ProcessEnvironment, non_empty_var};

#[cfg(test)]
pub use config_store::{MockConfigKey, MockConfigStore};
#[cfg(test)]
pub use environment::MockEnvironment;
