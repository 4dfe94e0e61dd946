//! Bundle identity update rules.

use std::collections::HashMap;

/// Rule key that applies to every bundle without an exact rule.
pub const WILDCARD: &str = "*";

const APPEND_PREFIX: char = '+';

/// New value for a free-text header such as `Bundle-Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextUpdate {
    Replace(String),
    Append(String),
}

impl TextUpdate {
    /// `+suffix` appends `suffix` to the old value; anything else replaces it.
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix(APPEND_PREFIX) {
            Some(suffix) => TextUpdate::Append(suffix.to_string()),
            None => TextUpdate::Replace(text.to_string()),
        }
    }

    pub fn apply(&self, old: &str) -> String {
        match self {
            TextUpdate::Replace(new) => new.clone(),
            TextUpdate::Append(suffix) => format!("{old}{suffix}"),
        }
    }
}

/// Target identity for one bundle update rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleUpdate {
    /// New symbolic name. For wildcard rules a single `*` stands for the old name.
    pub symbolic_name: String,
    pub version: Option<String>,
    pub name: Option<TextUpdate>,
    pub description: Option<TextUpdate>,
}

impl BundleUpdate {
    pub fn new(symbolic_name: &str) -> Self {
        Self {
            symbolic_name: symbolic_name.to_string(),
            version: None,
            name: None,
            description: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_name(mut self, update: TextUpdate) -> Self {
        self.name = Some(update);
        self
    }

    pub fn with_description(mut self, update: TextUpdate) -> Self {
        self.description = Some(update);
        self
    }

    pub fn update_name(&self, old: &str) -> Option<String> {
        non_empty(self.name.as_ref()?.apply(old))
    }

    pub fn update_description(&self, old: &str) -> Option<String> {
        non_empty(self.description.as_ref()?.apply(old))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// How a bundle update rule was selected.
///
/// Only exact matches may change `Bundle-Version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMatch<'a> {
    Exact(&'a BundleUpdate),
    Wildcard(&'a BundleUpdate),
}

impl<'a> IdentityMatch<'a> {
    pub fn update(&self) -> &'a BundleUpdate {
        match *self {
            IdentityMatch::Exact(update) | IdentityMatch::Wildcard(update) => update,
        }
    }

    /// Computes the new symbolic name (without any `;attr` suffix).
    pub fn symbolic_name(&self, original: &str) -> String {
        match *self {
            IdentityMatch::Exact(update) => update.symbolic_name.clone(),
            IdentityMatch::Wildcard(update) => {
                update.symbolic_name.replacen(WILDCARD, original, 1)
            }
        }
    }

    /// Version to force, if any. Always `None` for wildcard matches.
    pub fn version(&self) -> Option<&'a str> {
        match *self {
            IdentityMatch::Exact(update) => {
                update.version.as_deref().filter(|v| !v.is_empty())
            }
            IdentityMatch::Wildcard(_) => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match *self {
            IdentityMatch::Exact(_) => "identity update",
            IdentityMatch::Wildcard(_) => "a wildcard identity update",
        }
    }
}

/// Bundle update rules keyed by current symbolic name.
#[derive(Debug, Clone, Default)]
pub struct BundleRules {
    exact: HashMap<String, BundleUpdate>,
    wildcard: Option<BundleUpdate>,
}

impl BundleRules {
    /// Registers a rule; the key [`WILDCARD`] sets the fallback rule.
    pub fn insert(&mut self, symbolic_name: &str, update: BundleUpdate) {
        if symbolic_name == WILDCARD {
            self.wildcard = Some(update);
        } else {
            self.exact.insert(symbolic_name.to_string(), update);
        }
    }

    /// Exact rule for `symbolic_name`, else the wildcard rule.
    pub fn lookup(&self, symbolic_name: &str) -> Option<IdentityMatch<'_>> {
        self.exact
            .get(symbolic_name)
            .map(IdentityMatch::Exact)
            .or_else(|| self.wildcard.as_ref().map(IdentityMatch::Wildcard))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + usize::from(self.wildcard.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcard.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_update_append_and_replace() {
        assert_eq!(
            TextUpdate::parse("+ (Jakarta)").apply("Web"),
            "Web (Jakarta)"
        );
        assert_eq!(TextUpdate::parse("Other").apply("Web"), "Other");
    }

    #[test]
    fn test_empty_update_is_ignored() {
        let update = BundleUpdate::new("x").with_name(TextUpdate::Replace(String::new()));
        assert_eq!(update.update_name("Old"), None);
        assert_eq!(update.update_description("Old"), None);
    }

    #[test]
    fn test_lookup_prefers_exact_rule() {
        let mut rules = BundleRules::default();
        rules.insert("com.acme", BundleUpdate::new("com.acme.jakarta"));
        rules.insert(WILDCARD, BundleUpdate::new("*.ee"));

        assert!(matches!(rules.lookup("com.acme"), Some(IdentityMatch::Exact(_))));
        assert!(matches!(rules.lookup("org.other"), Some(IdentityMatch::Wildcard(_))));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_lookup_without_wildcard() {
        let mut rules = BundleRules::default();
        rules.insert("com.acme", BundleUpdate::new("com.acme.jakarta"));
        assert!(rules.lookup("org.other").is_none());
    }

    #[test]
    fn test_wildcard_substitutes_original_name() {
        let update = BundleUpdate::new("jakarta.*.bundle").with_version("9.0");
        let matched = IdentityMatch::Wildcard(&update);

        assert_eq!(matched.symbolic_name("com.acme"), "jakarta.com.acme.bundle");
        assert_eq!(matched.version(), None);
    }

    #[test]
    fn test_exact_keeps_literal_name_and_version() {
        let update = BundleUpdate::new("com.*.literal").with_version("9.0");
        let matched = IdentityMatch::Exact(&update);

        assert_eq!(matched.symbolic_name("com.acme"), "com.*.literal");
        assert_eq!(matched.version(), Some("9.0"));
    }
}
