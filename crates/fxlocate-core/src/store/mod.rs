//! Store implementations that need no platform support.

mod memory;

pub use memory::{MemoryConfigStore, MemoryKeyEntry, StoreFileError};
