//! Platform configuration store for fxlocate.
//!
//! On Windows this is the live registry. Other hosts have no registry, so
//! they get an empty in-memory store on which every key reports `NotFound`;
//! hosts that want answers there load a snapshot into `MemoryConfigStore`.

#![deny(unused_crate_dependencies)]

use std::sync::Arc;

use fxlocate_core::ConfigStore;

#[cfg(windows)]
mod win_registry;

#[cfg(windows)]
pub use win_registry::WindowsRegistry;

/// The configuration store of the running platform.
#[cfg(windows)]
pub fn system_store() -> Arc<dyn ConfigStore> {
    Arc::new(WindowsRegistry::new())
}

/// The configuration store of the running platform.
#[cfg(not(windows))]
pub fn system_store() -> Arc<dyn ConfigStore> {
    tracing::debug!("No system registry on this platform; using an empty store");
    Arc::new(fxlocate_core::MemoryConfigStore::new())
}
