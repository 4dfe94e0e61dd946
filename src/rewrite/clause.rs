//! Locates the attribute clause that follows a package name.
//!
//! ```text
//! Import-Package: javax.servlet;version="[2.6,3)",javax.servlet.http;version="[2.6,3)"
//!                              ^--- clause ----^
//! ```
//!
//! Commas separate packages, except inside quoted literals; version
//! ranges contain commas.

const QUOTE: char = '"';

/// Returns the clause at the head of `tail`, the text right after a
/// package name. Empty when the package has no attributes.
///
/// A comma ends the clause only if the quotes before it are balanced and
/// the next non-blank character is a letter. Without such a comma the
/// clause runs to the end; with unbalanced quotes it stops at the last
/// comma examined.
pub fn clause_of(tail: &str) -> &str {
    if !starts_with_semicolon(tail) {
        return "";
    }

    let Some(mut comma) = tail.find(',') else {
        return tail;
    };

    loop {
        if is_delimiting_comma(tail, comma) {
            return &tail[..comma];
        }

        match tail[comma + 1..].find(',') {
            Some(next) => comma += 1 + next,
            None => return tail,
        }

        if !has_balanced_quotes(tail) {
            return &tail[..comma];
        }
    }
}

fn starts_with_semicolon(text: &str) -> bool {
    text.chars().find(|c| !c.is_whitespace()) == Some(';')
}

fn is_delimiting_comma(text: &str, comma: usize) -> bool {
    let next = text[comma + 1..].chars().find(|c| !c.is_whitespace());
    next.is_some_and(char::is_alphabetic) && has_balanced_quotes(&text[..=comma])
}

fn has_balanced_quotes(text: &str) -> bool {
    text.matches(QUOTE).count() % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_attributes() {
        assert_eq!(clause_of(""), "");
        assert_eq!(clause_of(",com.bar"), "");
        assert_eq!(clause_of(".util;version=\"1\""), "");
    }

    #[test]
    fn test_clause_without_following_package() {
        assert_eq!(clause_of(";version=\"1.0\""), ";version=\"1.0\"");
        assert_eq!(clause_of("  ;version=\"1.0\""), "  ;version=\"1.0\"");
    }

    #[test]
    fn test_clause_ends_at_delimiting_comma() {
        assert_eq!(
            clause_of(";version=\"1.0\",com.bar;version=\"2.0\""),
            ";version=\"1.0\""
        );
        assert_eq!(clause_of(";version=\"1.0\", com.bar"), ";version=\"1.0\"");
    }

    #[test]
    fn test_comma_inside_version_range() {
        assert_eq!(
            clause_of(";version=\"[2.6,3)\",javax.servlet.http"),
            ";version=\"[2.6,3)\""
        );
    }

    #[test]
    fn test_comma_inside_quoted_letters() {
        assert_eq!(
            clause_of(";x=\"a,b\";version=\"1.0\",com.bar"),
            ";x=\"a,b\";version=\"1.0\""
        );
    }

    #[test]
    fn test_comma_followed_by_non_letter_is_not_a_delimiter() {
        assert_eq!(clause_of(";a=1,2;b=3"), ";a=1,2;b=3");
        assert_eq!(clause_of(";a=1,"), ";a=1,");
    }

    #[test]
    fn test_unbalanced_quotes_stop_at_last_comma() {
        assert_eq!(clause_of(";x=\"a,b,c"), ";x=\"a,b");
    }
}
