//! Manifest rewriting.
//!
//! [`ManifestTransformer`] drives the pieces: bundle identity first, then
//! package renames in the selected headers of every section. A manifest
//! with no changes is reported as such and never re-serialized.

mod clause;
mod document;
mod identity;
mod matcher;
mod packages;
mod select;
mod version;

pub use clause::clause_of;
pub use document::{ManifestTransformer, TransformReport, Transformed, apply, transform_document};
pub use identity::{DESCRIPTION, NAME, SYMBOLIC_NAME, VERSION, transform_identity};
pub use matcher::{JavaPackageMatcher, PackageMatcher};
pub use packages::rewrite_packages;
pub use select::{SELECTED_HEADERS, selects};
pub use version::{VersionSyntaxError, remove_version, replace_version, set_version};
