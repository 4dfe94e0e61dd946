//! TOML rule file loading.
//!
//! ```toml
//! [renames]
//! "javax.servlet.*" = "jakarta.servlet"
//! "javax.legacy" = "<remove>"
//!
//! [versions]
//! "jakarta.servlet" = "[5.0,6)"
//!
//! [bundles."*"]
//! symbolic-name = "*.jakarta"
//! ```
//!
//! Uses `toml_edit` so the `renames` table keeps document order, which is
//! the order rules are applied in.

use super::validate::RuleValidator;
use super::{BundleUpdate, RenameRule, RuleSet, TextUpdate};
use crate::error::{Result, TransformError};
use std::fs;
use std::path::Path;
use toml_edit::{DocumentMut, Item, TableLike};

const BUNDLE_FIELDS: &[&str] = &["symbolic-name", "version", "name", "description"];

/// Reads and validates a rule file.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let content = fs::read_to_string(path).map_err(|e| {
        TransformError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read rules {}: {}", path.display(), e),
        ))
    })?;

    let rules = parse_rules(&content)?;
    log::debug!(
        "Loaded {} rename(s), {} version override(s), {} bundle rule(s) from {}",
        rules.renames.len(),
        rules.versions.len(),
        rules.bundles.len(),
        path.display()
    );
    Ok(rules)
}

/// Parses rule file text.
pub fn parse_rules(content: &str) -> Result<RuleSet> {
    let doc: DocumentMut = content.parse()?;
    let validator = RuleValidator::new()?;
    let mut rules = RuleSet::new();

    for (section, item) in doc.as_table().iter() {
        let table = as_table(section, item)?;
        match section {
            "renames" => {
                for (from, value) in table.iter() {
                    let to = as_string(from, value)?;
                    validator.check_rename(from, to)?;
                    rules.renames.push(RenameRule::new(from, to));
                }
            }
            "versions" => {
                for (package, value) in table.iter() {
                    let version = as_string(package, value)?;
                    validator.check_version(package, version)?;
                    rules
                        .versions
                        .insert(package.to_string(), version.to_string());
                }
            }
            "bundles" => {
                for (pattern, value) in table.iter() {
                    let update = parse_bundle(pattern, as_table(pattern, value)?)?;
                    validator.check_bundle(pattern, &update.symbolic_name)?;
                    rules.bundles.insert(pattern, update);
                }
            }
            other => {
                return Err(TransformError::InvalidRule(
                    other.to_string(),
                    "unknown table (expected renames, versions or bundles)".to_string(),
                ));
            }
        }
    }

    Ok(rules)
}

fn parse_bundle(pattern: &str, table: &dyn TableLike) -> Result<BundleUpdate> {
    for (field, _) in table.iter() {
        if !BUNDLE_FIELDS.contains(&field) {
            return Err(TransformError::InvalidRule(
                pattern.to_string(),
                format!("unknown field '{field}'"),
            ));
        }
    }

    let symbolic_name = string_field(pattern, table, "symbolic-name")?.ok_or_else(|| {
        TransformError::InvalidRule(pattern.to_string(), "missing symbolic-name".to_string())
    })?;

    let mut update = BundleUpdate::new(symbolic_name);
    if let Some(version) = string_field(pattern, table, "version")? {
        update = update.with_version(version);
    }
    if let Some(name) = string_field(pattern, table, "name")? {
        update = update.with_name(TextUpdate::parse(name));
    }
    if let Some(description) = string_field(pattern, table, "description")? {
        update = update.with_description(TextUpdate::parse(description));
    }

    Ok(update)
}

fn string_field<'a>(
    pattern: &str,
    table: &'a dyn TableLike,
    name: &str,
) -> Result<Option<&'a str>> {
    table
        .get(name)
        .map(|item| as_string(pattern, item))
        .transpose()
}

fn as_table<'a>(key: &str, item: &'a Item) -> Result<&'a dyn TableLike> {
    item.as_table_like().ok_or_else(|| {
        TransformError::InvalidRule(key.to_string(), "expected a table".to_string())
    })
}

fn as_string<'a>(key: &str, item: &'a Item) -> Result<&'a str> {
    item.as_str().ok_or_else(|| {
        TransformError::InvalidRule(
            key.to_string(),
            "expected a string value (quote dotted package names)".to_string(),
        )
    })
}
