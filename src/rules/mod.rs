//! Rename, version and bundle identity rules.
//!
//! A [`RuleSet`] is built once per run, either from a TOML rule file
//! ([`load_rules`]) or programmatically, and is read-only while manifests
//! are transformed.

mod bundle;
mod config;
mod validate;

pub use bundle::{BundleRules, BundleUpdate, IdentityMatch, TextUpdate, WILDCARD};
pub use config::{load_rules, parse_rules};
pub use validate::RuleValidator;

use std::collections::HashMap;
use std::fmt;

/// Replacement text that deletes the package reference instead of renaming it.
pub const REMOVE_MARKER: &str = "<remove>";

/// Suffix marking a pattern as "this package and all subpackages".
pub const SUBPACKAGE_SUFFIX: &str = ".*";

/// Package name to match, optionally covering its dotted descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePattern {
    name: String,
    subpackages: bool,
}

impl PackagePattern {
    /// Parses `com.foo` or `com.foo.*`.
    pub fn parse(text: &str) -> Self {
        match text.strip_suffix(SUBPACKAGE_SUFFIX) {
            Some(name) => Self {
                name: name.to_string(),
                subpackages: true,
            },
            None => Self {
                name: text.to_string(),
                subpackages: false,
            },
        }
    }

    /// Literal package name, without the wildcard suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches_subpackages(&self) -> bool {
        self.subpackages
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpackages {
            write!(f, "{}{}", self.name, SUBPACKAGE_SUFFIX)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// One entry of the ordered rename table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameRule {
    /// Replace the package name, keeping its attribute clause.
    Replace { package: PackagePattern, to: String },
    /// Delete the package name together with its attribute clause.
    Remove { package: PackagePattern },
}

impl RenameRule {
    /// Builds a rule from a rename table entry.
    ///
    /// A replacement equal to [`REMOVE_MARKER`] produces [`RenameRule::Remove`].
    pub fn new(from: &str, to: &str) -> Self {
        let package = PackagePattern::parse(from);
        if to == REMOVE_MARKER {
            RenameRule::Remove { package }
        } else {
            RenameRule::Replace {
                package,
                to: to.to_string(),
            }
        }
    }

    pub fn package(&self) -> &PackagePattern {
        match self {
            RenameRule::Replace { package, .. } | RenameRule::Remove { package } => package,
        }
    }

    /// Text written in place of a matched package name.
    pub fn replacement(&self) -> &str {
        match self {
            RenameRule::Replace { to, .. } => to,
            RenameRule::Remove { .. } => "",
        }
    }
}

/// Replacement package name → version text forced after substitution.
pub type VersionOverrides = HashMap<String, String>;

/// Everything a transform run needs.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Applied in order; each rule runs over the output of the previous one.
    pub renames: Vec<RenameRule>,
    pub versions: VersionOverrides,
    pub bundles: BundleRules,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rename rule (`to` may be [`REMOVE_MARKER`]).
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.renames.push(RenameRule::new(from, to));
        self
    }

    /// Forces `version` on every package renamed to `package`.
    pub fn version(mut self, package: &str, version: &str) -> Self {
        self.versions
            .insert(package.to_string(), version.to_string());
        self
    }

    /// Adds a bundle identity rule keyed by symbolic name or [`WILDCARD`].
    pub fn bundle(mut self, symbolic_name: &str, update: BundleUpdate) -> Self {
        self.bundles.insert(symbolic_name, update);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_parse() {
        let exact = PackagePattern::parse("com.foo");
        assert_eq!(exact.name(), "com.foo");
        assert!(!exact.matches_subpackages());

        let wildcard = PackagePattern::parse("com.foo.*");
        assert_eq!(wildcard.name(), "com.foo");
        assert!(wildcard.matches_subpackages());
        assert_eq!(wildcard.to_string(), "com.foo.*");
    }

    #[test]
    fn test_remove_marker_builds_remove_rule() {
        let rule = RenameRule::new("com.foo", REMOVE_MARKER);
        assert!(matches!(rule, RenameRule::Remove { .. }));
        assert_eq!(rule.replacement(), "");
        assert_eq!(rule.package().name(), "com.foo");
    }

    #[test]
    fn test_builder_keeps_rename_order() {
        let rules = RuleSet::new()
            .rename("a.b", "c.d")
            .rename("e.f.*", "g.h")
            .version("c.d", "1.0");

        let names: Vec<_> = rules.renames.iter().map(|r| r.package().to_string()).collect();
        assert_eq!(names, ["a.b", "e.f.*"]);
        assert_eq!(rules.versions.get("c.d").map(String::as_str), Some("1.0"));
        assert!(!rules.is_empty());
    }
}
