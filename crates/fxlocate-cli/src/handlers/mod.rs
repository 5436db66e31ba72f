//! Command handlers.
//!
//! Each handler takes the bootstrapped [`crate::CliContext`] and an output
//! sink, so the same code path serves the binary and the tests.

pub mod read;
pub mod resolve;
