//! Manifest serialization in two layouts.
//!
//! - [`write_manifest`]: standard `MANIFEST.MF`, CRLF lines wrapped at
//!   72 bytes, all sections
//! - [`write_feature`]: feature manifests, main section only, one header
//!   clause per line

use super::{MANIFEST_VERSION, Manifest, NAME, parse_header};

/// Maximum bytes per physical manifest line, excluding the line break.
pub const LINE_WIDTH: usize = 72;

const LINE_BREAK: &str = "\r\n";
const CLAUSE_SEPARATOR: &str = ",\r\n ";

/// Quotes an attribute value for the feature layout.
///
/// Supplied by the caller; any `Fn(&str) -> String` works.
pub trait ValueQuoter {
    fn quote(&self, value: &str) -> String;
}

impl<F> ValueQuoter for F
where
    F: Fn(&str) -> String,
{
    fn quote(&self, value: &str) -> String {
        self(value)
    }
}

/// Writes the standard layout: `Manifest-Version` first, then the main
/// headers in order, then each named section.
pub fn write_manifest(manifest: &Manifest) -> String {
    let mut out = String::new();
    let main = manifest.main();

    if let Some(version) = main.get(MANIFEST_VERSION) {
        write_header(&mut out, MANIFEST_VERSION, version);
    }
    for (name, value) in main.iter() {
        if !name.eq_ignore_ascii_case(MANIFEST_VERSION) {
            write_header(&mut out, name, value);
        }
    }
    out.push_str(LINE_BREAK);

    for (entry, attrs) in manifest.entries() {
        write_header(&mut out, NAME, entry);
        for (name, value) in attrs.iter() {
            write_header(&mut out, name, value);
        }
        out.push_str(LINE_BREAK);
    }

    out
}

/// Writes the feature layout.
///
/// Values without a comma are written verbatim. Others are split into
/// clauses, written as `name; key=quoted` and joined by a comma plus a
/// continuation line.
pub fn write_feature(manifest: &Manifest, quoter: &dyn ValueQuoter) -> String {
    let mut out = String::new();

    for (name, value) in manifest.main().iter() {
        out.push_str(name);
        out.push_str(": ");

        if !value.contains(',') {
            out.push_str(value);
        } else {
            let mut continued = false;
            for clause in parse_header(value) {
                for clause_name in &clause.names {
                    if continued {
                        out.push_str(CLAUSE_SEPARATOR);
                    }
                    out.push_str(clause_name);
                    for (key, attr) in &clause.attributes {
                        out.push_str("; ");
                        out.push_str(key);
                        out.push('=');
                        out.push_str(&quoter.quote(attr));
                    }
                    continued = true;
                }
            }
        }

        out.push_str(LINE_BREAK);
    }

    out
}

fn write_header(out: &mut String, name: &str, value: &str) {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut width = LINE_WIDTH;
    let mut continuation = false;

    loop {
        let cut = floor_char_boundary(rest, width);
        if continuation {
            out.push(' ');
        }
        out.push_str(&rest[..cut]);
        out.push_str(LINE_BREAK);

        rest = &rest[cut..];
        if rest.is_empty() {
            break;
        }
        continuation = true;
        width = LINE_WIDTH - 1;
    }
}

/// Largest char boundary not past `max`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
