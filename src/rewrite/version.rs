//! Version attribute editing inside a package clause.
//!
//! Only quoted versions are rewritten:
//!
//! ```text
//! ;version="[2.6,3)"      ok
//! ; version = "1.0"       ok, blanks around '=' are skipped
//! ;version=1.0            VersionSyntaxError::MissingOpenQuote
//! ```
//!
//! Errors are diagnostics. Callers keep the original text and carry on.

use super::clause::clause_of;
use thiserror::Error;

const VERSION: &str = "version";
const QUOTE: char = '"';

/// Malformed `version` attribute found while rewriting a clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionSyntaxError {
    #[error("Syntax error, expected '=' after version in [{0}]")]
    MissingEquals(String),

    #[error("Syntax error, expected quotation mark after '=' in version [{0}]")]
    MissingOpenQuote(String),

    #[error("Syntax error, package version does not have closing quotation mark [{0}]")]
    MissingCloseQuote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    SeekEquals,
    SeekQuoteOpen,
    SeekQuoteClose { begin: usize },
}

/// Replaces the text between the quotes of the first `version` attribute
/// in `clause`. A clause without `version` is returned unchanged.
pub fn set_version(clause: &str, new_version: &str) -> Result<String, VersionSyntaxError> {
    let Some(at) = clause.find(VERSION) else {
        return Ok(clause.to_string());
    };

    let from = at + VERSION.len();
    let mut state = Scan::SeekEquals;

    for (offset, ch) in clause[from..].char_indices() {
        let idx = from + offset;
        state = match state {
            Scan::SeekEquals if ch == '=' => Scan::SeekQuoteOpen,
            Scan::SeekEquals if ch.is_whitespace() => state,
            Scan::SeekEquals => return Err(VersionSyntaxError::MissingEquals(clause.to_string())),

            Scan::SeekQuoteOpen if ch == QUOTE => Scan::SeekQuoteClose {
                begin: idx + QUOTE.len_utf8(),
            },
            Scan::SeekQuoteOpen if ch.is_whitespace() => state,
            Scan::SeekQuoteOpen => {
                return Err(VersionSyntaxError::MissingOpenQuote(clause.to_string()));
            }

            Scan::SeekQuoteClose { begin } if ch == QUOTE => {
                return Ok(format!(
                    "{}{}{}",
                    &clause[..begin],
                    new_version,
                    &clause[idx..]
                ));
            }
            Scan::SeekQuoteClose { .. } => state,
        };
    }

    let clause = clause.to_string();
    Err(match state {
        Scan::SeekEquals => VersionSyntaxError::MissingEquals(clause),
        Scan::SeekQuoteOpen => VersionSyntaxError::MissingOpenQuote(clause),
        Scan::SeekQuoteClose { .. } => VersionSyntaxError::MissingCloseQuote(clause),
    })
}

/// Rewrites the version in the clause at the head of `tail`.
pub fn replace_version(tail: &str, new_version: &str) -> Result<String, VersionSyntaxError> {
    let clause = clause_of(tail);
    if clause.is_empty() {
        return Ok(tail.to_string());
    }

    let edited = set_version(clause, new_version)?;
    Ok(edited + &tail[clause.len()..])
}

/// Drops the clause at the head of `tail`, keeping whatever follows it.
pub fn remove_version(tail: &str) -> &str {
    let clause = clause_of(tail);
    if clause.is_empty() {
        return tail;
    }

    log::debug!("Removing package attributes [{}]", clause);
    &tail[clause.len()..]
}
