//! Test-only adapters that live inside the domain crate for convenience.
//!
//! These are intended for unit testing and the demo CLI. The SQLite page
//! source lives in its own crate.

pub mod memory_source;
