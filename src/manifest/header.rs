//! OSGi header clause splitting.
//!
//! Used by the feature writer to lay a header out one clause per line.
//! Separators inside quoted literals are not separators.

/// One comma-separated clause: package or capability names plus their
/// `key=value` attributes and `key:=value` directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderClause {
    pub names: Vec<String>,
    /// Directive keys keep their trailing `:`; values are unquoted.
    pub attributes: Vec<(String, String)>,
}

/// Parses a header value into clauses.
pub fn parse_header(value: &str) -> Vec<HeaderClause> {
    split_top_level(value, ',')
        .into_iter()
        .filter_map(|clause| {
            let mut parsed = HeaderClause::default();
            for part in split_top_level(clause, ';') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                match part.split_once('=') {
                    Some((key, value)) => parsed
                        .attributes
                        .push((key.trim().to_string(), unquote(value.trim()))),
                    None => parsed.names.push(part.to_string()),
                }
            }
            (!parsed.names.is_empty()).then_some(parsed)
        })
        .collect()
}

/// Splits on `separator` outside of double-quoted literals.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == separator && !in_quotes => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&text[start..]);
    parts
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\""),
        None => value.to_string(),
    }
}
