//! Bundle identity rewriting.
//!
//! Updates `Bundle-SymbolicName`, `Bundle-Version`, `Bundle-Name` and
//! `Bundle-Description` in the main section from the rule selected by the
//! current symbolic name. Other identity headers (vendor, license, ...)
//! are left alone.

use crate::manifest::Attributes;
use crate::rules::BundleRules;

pub const SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const VERSION: &str = "Bundle-Version";
pub const NAME: &str = "Bundle-Name";
pub const DESCRIPTION: &str = "Bundle-Description";

/// Rewrites the bundle identity in `main`. Returns `true` if any header
/// value changed.
///
/// Attributes after the symbolic name (`;singleton:=true`) are kept.
pub fn transform_identity(main: &mut Attributes, rules: &BundleRules) -> bool {
    let Some(initial) = main.get(SYMBOLIC_NAME).map(str::to_string) else {
        log::debug!("No bundle symbolic name");
        return false;
    };

    let (symbolic_name, attributes) = match initial.find(';') {
        Some(idx) => initial.split_at(idx),
        None => (initial.as_str(), ""),
    };

    let Some(matched) = rules.lookup(symbolic_name) else {
        log::debug!("Symbolic name [{}] has no identity update", symbolic_name);
        return false;
    };
    log::debug!(
        "Symbolic name [{}] has {}",
        symbolic_name,
        matched.describe()
    );

    let mut changed = false;

    let final_name = matched.symbolic_name(symbolic_name) + attributes;
    changed |= update_header(main, SYMBOLIC_NAME, final_name);

    if let Some(version) = matched.version() {
        if main.get(VERSION).is_some() {
            changed |= update_header(main, VERSION, version.to_string());
        }
    }

    let update = matched.update();
    if let Some(name) = main.get(NAME).and_then(|old| update.update_name(old)) {
        changed |= update_header(main, NAME, name);
    }
    if let Some(description) = main
        .get(DESCRIPTION)
        .and_then(|old| update.update_description(old))
    {
        changed |= update_header(main, DESCRIPTION, description);
    }

    changed
}

fn update_header(main: &mut Attributes, header: &str, value: String) -> bool {
    let previous = main.insert(header, value.as_str());
    let changed = previous.as_deref() != Some(value.as_str());
    if changed {
        log::info!(
            "{}: {} --> {}",
            header,
            previous.as_deref().unwrap_or_default(),
            value
        );
    }
    changed
}
