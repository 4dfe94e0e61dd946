//! Whole-manifest transformation.

use super::identity::transform_identity;
use super::matcher::{JavaPackageMatcher, PackageMatcher};
use super::packages::rewrite_packages;
use super::select::selects;
use super::version::VersionSyntaxError;
use crate::error::Result;
use crate::manifest::{Attributes, Manifest, write_manifest};
use crate::rules::RuleSet;

/// Outcome of transforming one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Header values rewritten, plus one if the bundle identity changed.
    pub changes: usize,
    /// Version clauses left alone because they could not be parsed.
    pub diagnostics: Vec<VersionSyntaxError>,
}

impl TransformReport {
    /// An unchanged manifest must not be written back.
    pub fn is_unchanged(&self) -> bool {
        self.changes == 0
    }
}

/// A rewritten manifest and what changed in it.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub manifest: Manifest,
    pub report: TransformReport,
}

/// Applies a [`RuleSet`] to manifests.
///
/// Holds no mutable state; one transformer can serve any number of
/// manifests, from any number of threads when the matcher is `Sync`.
pub struct ManifestTransformer<'a, M = JavaPackageMatcher> {
    rules: &'a RuleSet,
    matcher: M,
}

impl<'a> ManifestTransformer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self::with_matcher(rules, JavaPackageMatcher)
    }
}

impl<'a, M: PackageMatcher> ManifestTransformer<'a, M> {
    pub fn with_matcher(rules: &'a RuleSet, matcher: M) -> Self {
        Self { rules, matcher }
    }

    /// Rewrites package names in one header value.
    ///
    /// Returns `None` if no rename rule matched.
    pub fn rewrite_value(
        &self,
        value: &str,
        diagnostics: &mut Vec<VersionSyntaxError>,
    ) -> Option<String> {
        rewrite_packages(
            value,
            &self.rules.renames,
            &self.rules.versions,
            &self.matcher,
            diagnostics,
        )
    }

    /// Rewrites every selected header of one section in place. Returns the
    /// number of values replaced.
    pub fn transform_attributes(
        &self,
        section: &str,
        attrs: &mut Attributes,
        diagnostics: &mut Vec<VersionSyntaxError>,
    ) -> usize {
        log::debug!("Transforming [{}] attributes [{}]", section, attrs.len());

        let mut replacements = 0;
        for (name, value) in attrs.iter_mut() {
            if !selects(name) {
                continue;
            }
            if let Some(rewritten) = self.rewrite_value(value, diagnostics) {
                *value = rewritten;
                replacements += 1;
            }
        }

        log::debug!(
            "Transformed [{}] attributes [{}] replacements [{}]",
            section,
            attrs.len(),
            replacements
        );
        replacements
    }

    /// Transforms a copy of `manifest`: bundle identity first, then the
    /// package headers of the main section and every named entry.
    pub fn transform(&self, manifest: &Manifest) -> Transformed {
        let mut result = manifest.clone();
        let mut report = TransformReport::default();

        if transform_identity(result.main_mut(), &self.rules.bundles) {
            report.changes += 1;
        }

        report.changes +=
            self.transform_attributes("main", result.main_mut(), &mut report.diagnostics);

        for (entry, attrs) in result.entries_mut() {
            report.changes += self.transform_attributes(entry, attrs, &mut report.diagnostics);
        }

        Transformed {
            manifest: result,
            report,
        }
    }

    /// Parses and transforms manifest text.
    ///
    /// Returns `Ok(None)` when nothing changed, so the input can be kept
    /// byte for byte.
    pub fn apply(&self, name: &str, text: &str) -> Result<Option<Transformed>> {
        log::debug!("[{}] Initial bytes [{}]", name, text.len());

        let manifest = Manifest::parse(text)?;
        let transformed = self.transform(&manifest);

        if transformed.report.is_unchanged() {
            log::debug!("[{}] Null transform", name);
            return Ok(None);
        }

        log::debug!(
            "[{}] Active transform; changes [{}]",
            name,
            transformed.report.changes
        );
        Ok(Some(transformed))
    }
}

/// Transforms one manifest with the default package matcher.
pub fn transform_document(manifest: &Manifest, rules: &RuleSet) -> Transformed {
    ManifestTransformer::new(rules).transform(manifest)
}

/// Rewrites `MANIFEST.MF` text.
///
/// Returns the serialized manifest, or `None` if no header changed.
pub fn apply(name: &str, text: &str, rules: &RuleSet) -> Result<Option<String>> {
    let transformed = ManifestTransformer::new(rules).apply(name, text)?;
    Ok(transformed.map(|t| write_manifest(&t.manifest)))
}
