//! JAR manifest documents.
//!
//! A [`Manifest`] holds one main [`Attributes`] section plus named entry
//! sections. Header order is insertion order and survives a
//! read/write cycle; header lookup ignores ASCII case.

mod header;
mod reader;
mod writer;

pub use header::{HeaderClause, parse_header, split_top_level};
pub use writer::{LINE_WIDTH, ValueQuoter, write_feature, write_manifest};

use crate::error::Result;
use std::path::Path;

pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const NAME: &str = "Name";

/// Ordered header name → value mapping for one manifest section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Sets a header value, keeping the original position and spelling of
    /// an existing header. Returns the previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        match self.position(name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name.to_string(), value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            let name: String = k.into();
            attrs.insert(&name, v);
        }
        attrs
    }
}

/// A parsed manifest: main section plus named entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    entries: Vec<(String, Attributes)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses manifest text.
    pub fn parse(text: &str) -> Result<Self> {
        reader::parse(text)
    }

    pub fn main(&self) -> &Attributes {
        &self.main
    }

    pub fn main_mut(&mut self) -> &mut Attributes {
        &mut self.main
    }

    pub fn entry(&self, name: &str) -> Option<&Attributes> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, attrs)| attrs)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&str, &mut Attributes)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds a named section. Headers of a repeated name merge into the
    /// existing section.
    pub fn insert_entry(&mut self, name: &str, attrs: Attributes) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => {
                for (k, v) in attrs.iter() {
                    existing.insert(k, v);
                }
            }
            None => self.entries.push((name.to_string(), attrs)),
        }
    }
}

/// Output layout for a rewritten manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// `META-INF/MANIFEST.MF`: wrapped at 72 bytes, all sections.
    Manifest,
    /// Feature manifests (`*.mf`): main section, one clause per line.
    Feature,
}

impl Flavor {
    /// Picks the flavor from a file name, or `None` for non-manifest files.
    pub fn for_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if file_name == "manifest.mf" {
            Some(Flavor::Manifest)
        } else if file_name.ends_with(".mf") {
            Some(Flavor::Feature)
        } else {
            None
        }
    }
}
