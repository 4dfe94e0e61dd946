//! Manifest text reader.
//!
//! ## Grammar
//!
//! - Lines end in CRLF, LF or CR
//! - `Header-Name: value`; a line starting with one space continues the
//!   previous header
//! - The main section ends at the first blank line
//! - Every later section starts with a `Name:` header naming the entry

use super::{Attributes, Manifest, NAME};
use crate::error::{Result, TransformError};

#[derive(Debug)]
enum Section {
    Main,
    /// Between a blank line and the next `Name:` header.
    AwaitingName,
    Entry(String, Attributes),
}

pub(super) fn parse(text: &str) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    let mut section = Section::Main;
    let mut pending: Option<(usize, String)> = None;

    for (idx, line) in split_lines(text).into_iter().enumerate() {
        let line_no = idx + 1;

        if let Some(continuation) = line.strip_prefix(' ') {
            match pending.as_mut() {
                Some((_, header)) => header.push_str(continuation),
                None => return Err(invalid(line_no, "continuation line without a header")),
            }
            continue;
        }

        if let Some((header_line, header)) = pending.take() {
            section = apply_header(&mut manifest, section, header_line, &header)?;
        }

        if line.is_empty() {
            section = close_section(&mut manifest, section);
        } else {
            pending = Some((line_no, line.to_string()));
        }
    }

    if let Some((header_line, header)) = pending.take() {
        section = apply_header(&mut manifest, section, header_line, &header)?;
    }
    close_section(&mut manifest, section);

    Ok(manifest)
}

fn apply_header(
    manifest: &mut Manifest,
    section: Section,
    line_no: usize,
    header: &str,
) -> Result<Section> {
    let (name, value) = header
        .split_once(": ")
        .ok_or_else(|| invalid(line_no, "header is missing the ': ' separator"))?;

    if name.is_empty() {
        return Err(invalid(line_no, "empty header name"));
    }

    if name.contains(char::is_whitespace) {
        return Err(invalid(line_no, &format!("invalid header name '{name}'")));
    }

    match section {
        Section::Main => {
            manifest.main_mut().insert(name, value);
            Ok(Section::Main)
        }
        Section::AwaitingName if name.eq_ignore_ascii_case(NAME) => {
            Ok(Section::Entry(value.to_string(), Attributes::new()))
        }
        Section::AwaitingName => Err(invalid(
            line_no,
            &format!("entry section starts with '{name}' instead of '{NAME}'"),
        )),
        Section::Entry(entry, mut attrs) => {
            attrs.insert(name, value);
            Ok(Section::Entry(entry, attrs))
        }
    }
}

fn close_section(manifest: &mut Manifest, section: Section) -> Section {
    if let Section::Entry(name, attrs) = section {
        manifest.insert_entry(&name, attrs);
    }
    Section::AwaitingName
}

/// Splits on CRLF, LF or lone CR.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn invalid(line: usize, reason: &str) -> TransformError {
    TransformError::InvalidManifest {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_and_entries() {
        let text = "Manifest-Version: 1.0\r\n\
                    Bundle-SymbolicName: com.acme\r\n\
                    \r\n\
                    Name: com/acme/A.class\r\n\
                    Import-Package: javax.servlet\r\n\
                    \r\n\
                    Name: com/acme/B.class\r\n\
                    X-Flag: on\r\n";

        let manifest = parse(text).unwrap();
        assert_eq!(manifest.main().get("Bundle-SymbolicName"), Some("com.acme"));
        assert_eq!(manifest.main().len(), 2);

        let names: Vec<_> = manifest.entries().map(|(k, _)| k).collect();
        assert_eq!(names, ["com/acme/A.class", "com/acme/B.class"]);
        assert_eq!(
            manifest.entry("com/acme/A.class").unwrap().get("Import-Package"),
            Some("javax.servlet")
        );
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let text = "Import-Package: javax.servlet;version=\"[2.6,3)\",javax.servlet.annotati\n on;version=\"[2.6,3)\"\n";

        let manifest = parse(text).unwrap();
        assert_eq!(
            manifest.main().get("Import-Package"),
            Some("javax.servlet;version=\"[2.6,3)\",javax.servlet.annotation;version=\"[2.6,3)\"")
        );
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n"), ["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_multiple_blank_lines_between_sections() {
        let text = "A: 1\n\n\nName: x\nB: 2\n\n\n";
        let manifest = parse(text).unwrap();
        assert_eq!(manifest.entry("x").unwrap().get("B"), Some("2"));
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let manifest = parse("Bundle-Description: \n").unwrap();
        assert_eq!(manifest.main().get("Bundle-Description"), Some(""));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse("Manifest-Version: 1.0\nBroken\n").unwrap_err();
        assert!(matches!(err, TransformError::InvalidManifest { line: 2, .. }));
    }

    #[test]
    fn test_leading_continuation() {
        let err = parse(" orphan\n").unwrap_err();
        assert!(matches!(err, TransformError::InvalidManifest { line: 1, .. }));
    }

    #[test]
    fn test_entry_section_without_name() {
        let err = parse("A: 1\n\nB: 2\n").unwrap_err();
        assert!(matches!(err, TransformError::InvalidManifest { line: 3, .. }));
    }
}
