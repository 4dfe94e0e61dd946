//! Whole-package-name checks for literal matches.

/// Decides whether a literal occurrence of a package name inside header
/// text is a real reference to that package.
pub trait PackageMatcher {
    /// `start..start + len` is the matched byte range in `text`.
    fn is_true_package_match(&self, text: &str, start: usize, len: usize, subpackages: bool)
    -> bool;
}

/// Boundary rules for Java package names.
///
/// Rejects a match when:
/// - it is preceded by an identifier character or `.`
/// - it is followed by an identifier character
/// - it is followed by `.` and an identifier start, unless subpackages
///   are wanted
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaPackageMatcher;

impl PackageMatcher for JavaPackageMatcher {
    fn is_true_package_match(
        &self,
        text: &str,
        start: usize,
        len: usize,
        subpackages: bool,
    ) -> bool {
        if let Some(before) = text[..start].chars().next_back() {
            if is_identifier_part(before) || before == '.' {
                return false;
            }
        }

        let mut after = text[start + len..].chars();
        match after.next() {
            Some(c) if is_identifier_part(c) => false,
            Some('.') if !subpackages => !after.next().is_some_and(is_identifier_start),
            _ => true,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
