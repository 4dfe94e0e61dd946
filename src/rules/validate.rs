//! Validation rules for rule-file entries.
//!
//! Pure functions with no I/O or side effects.

use super::{REMOVE_MARKER, SUBPACKAGE_SUFFIX, WILDCARD};
use crate::error::{Result, TransformError};
use regex::Regex;

const PACKAGE_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$";
const SYMBOLIC_NAME_PATTERN: &str = r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-]+)*$";

/// Compiled checks for package and symbolic names.
pub struct RuleValidator {
    package: Regex,
    symbolic_name: Regex,
}

impl RuleValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            package: Regex::new(PACKAGE_PATTERN)?,
            symbolic_name: Regex::new(SYMBOLIC_NAME_PATTERN)?,
        })
    }

    /// Validates a `renames` entry.
    ///
    /// ## Rules
    /// - Key is a dotted Java package name, optionally ending in `.*`
    /// - Value is a package name or `<remove>`
    pub fn check_rename(&self, from: &str, to: &str) -> Result<()> {
        let package = from.strip_suffix(SUBPACKAGE_SUFFIX).unwrap_or(from);
        if !self.package.is_match(package) {
            return Err(invalid(from, "not a package name or package wildcard"));
        }

        if to != REMOVE_MARKER && !self.package.is_match(to) {
            return Err(invalid(
                from,
                &format!("replacement '{to}' is not a package name or {REMOVE_MARKER}"),
            ));
        }

        Ok(())
    }

    /// Validates a `versions` entry.
    pub fn check_version(&self, package: &str, version: &str) -> Result<()> {
        if !self.package.is_match(package) {
            return Err(invalid(package, "not a package name"));
        }

        if version.trim().is_empty() {
            return Err(invalid(package, "version cannot be empty"));
        }

        if version.contains('"') {
            return Err(invalid(package, "version cannot contain quotation marks"));
        }

        Ok(())
    }

    /// Validates a `bundles` key and its target symbolic name.
    ///
    /// A wildcard rule may place one `*` in the new name; exact rules may not.
    pub fn check_bundle(&self, pattern: &str, new_name: &str) -> Result<()> {
        if pattern != WILDCARD && !self.symbolic_name.is_match(pattern) {
            return Err(invalid(pattern, "not a bundle symbolic name"));
        }

        let placeholders = new_name.matches(WILDCARD).count();
        if placeholders > 1 {
            return Err(invalid(pattern, "symbolic-name may contain at most one '*'"));
        }

        if placeholders == 1 && pattern != WILDCARD {
            log::warn!(
                "Bundle rule '{}' is not a wildcard rule; '*' in '{}' is kept literally",
                pattern,
                new_name
            );
        }

        let literal = new_name.replacen(WILDCARD, "x", 1);
        if !self.symbolic_name.is_match(&literal) {
            return Err(invalid(
                pattern,
                &format!("symbolic-name '{new_name}' is not a bundle symbolic name"),
            ));
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> TransformError {
    TransformError::InvalidRule(key.to_string(), reason.to_string())
}
