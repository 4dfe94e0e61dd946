//! File system writes with transaction support.
//!
//! Rewritten manifests are staged and then committed or rolled back as a
//! unit.

pub mod transaction;

pub use transaction::{FileUpdate, Transaction};
