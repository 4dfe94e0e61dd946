//! Package name replacement inside one header value.
//!
//! Each rename rule runs to completion over the current text before the
//! next rule starts. Within a rule, matches are found left to right and
//! the cursor never re-enters replaced text.

use super::matcher::PackageMatcher;
use super::version::{VersionSyntaxError, remove_version, replace_version};
use crate::rules::{RenameRule, VersionOverrides};

/// Applies every rule to `value`.
///
/// Returns `None` when no rule matched. Version syntax problems leave that
/// clause as it was and are pushed to `diagnostics`.
pub fn rewrite_packages(
    value: &str,
    rules: &[RenameRule],
    versions: &VersionOverrides,
    matcher: &dyn PackageMatcher,
    diagnostics: &mut Vec<VersionSyntaxError>,
) -> Option<String> {
    let mut text = value.to_string();
    let mut changed = false;

    for rule in rules {
        let package = rule.package();
        let key = package.name();
        if key.is_empty() {
            continue;
        }

        let mut cursor = 0;
        while cursor + key.len() <= text.len() {
            let Some(offset) = text[cursor..].find(key) else {
                break;
            };
            let start = cursor + offset;
            let end = start + key.len();

            if !matcher.is_true_package_match(&text, start, key.len(), package.matches_subpackages())
            {
                cursor = end;
                continue;
            }

            let tail = rewrite_tail(value, rule, &text[end..], versions, diagnostics);
            let replacement = rule.replacement();

            let mut next = String::with_capacity(start + replacement.len() + tail.len());
            next.push_str(&text[..start]);
            next.push_str(replacement);
            next.push_str(&tail);

            text = next;
            cursor = start + replacement.len();
            changed = true;
        }
    }

    changed.then_some(text)
}

/// Text following a matched package name, with its clause adjusted.
fn rewrite_tail(
    initial: &str,
    rule: &RenameRule,
    tail: &str,
    versions: &VersionOverrides,
    diagnostics: &mut Vec<VersionSyntaxError>,
) -> String {
    match rule {
        RenameRule::Remove { .. } => remove_version(tail).to_string(),
        RenameRule::Replace { package, to } => match versions.get(to) {
            Some(version) => replace_version(tail, version).unwrap_or_else(|err| {
                log::error!("{}", err);
                diagnostics.push(err);
                tail.to_string()
            }),
            None => {
                log::debug!(
                    "Rewriting [{}]: [{} -> {}]; leaving version",
                    initial,
                    package,
                    to
                );
                tail.to_string()
            }
        },
    }
}
