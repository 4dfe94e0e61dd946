//! Error types for osgi-rename.
//!
//! All operations return `Result<T>` which aliases `Result<T, TransformError>`.
//! Malformed version clauses are not errors at this level; see
//! [`crate::rewrite::VersionSyntaxError`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors from transform operations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Manifest text does not follow the JAR manifest grammar.
    #[error("Invalid manifest at line {line}: {reason}")]
    InvalidManifest { line: usize, reason: String },

    /// Rule file entry is unusable.
    #[error("Invalid rule '{0}': {1}")]
    InvalidRule(String, String),

    /// None of the given paths contained a manifest.
    #[error("No manifest files found under {0}")]
    NothingToDo(PathBuf),

    /// Rollback failed after commit error.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML parse error in the rule file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for osgi-rename operations.
pub type Result<T> = std::result::Result<T, TransformError>;
