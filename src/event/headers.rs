//! Edge header map.
//!
//! Edge events key headers by lower-cased name and keep the original casing
//! inside each entry:
//!
//! ```text
//! "content-type": [{ "key": "Content-Type", "value": "text/html" }]
//! ```
//!
//! # Design Decisions
//! - Map keys are always lower-cased, even when the wire sent mixed case
//! - Names keep the order they arrived or were first added in; a name may
//!   carry several values, kept in order too
//! - `insert` overwrites, `append` adds

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single header value with the casing it was received (or should be sent) with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name in its original casing. Edge hosts allow this to be omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Header value.
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

/// Header map keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Vec<HeaderEntry>>")]
pub struct Headers(IndexMap<String, Vec<HeaderEntry>>);

impl From<IndexMap<String, Vec<HeaderEntry>>> for Headers {
    fn from(raw: IndexMap<String, Vec<HeaderEntry>>) -> Self {
        let mut headers = Headers::default();
        for (name, entries) in raw {
            headers
                .0
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(entries);
        }
        headers
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a single value, replacing whatever was there. A replaced
    /// name keeps its position.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(
            name.to_ascii_lowercase(),
            vec![HeaderEntry::new(name, value)],
        );
    }

    /// Add a value for `name`, keeping existing ones.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.0
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(HeaderEntry::new(name, value));
    }

    /// Replace all entries for `name` with the given ones.
    pub fn set_entries(&mut self, name: &str, entries: Vec<HeaderEntry>) {
        self.0.insert(name.to_ascii_lowercase(), entries);
    }

    /// First value for `name` (case-insensitive).
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }

    /// All entries for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&[HeaderEntry]> {
        self.0.get(&name.to_ascii_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<HeaderEntry>> {
        self.0.shift_remove(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(lower-cased name, entries)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HeaderEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterate every entry as `(original-case name, value)`, falling back to
    /// the lower-cased name when the entry carries no `key`.
    pub fn flatten(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(name, entries)| {
            entries.iter().map(move |entry| {
                (
                    entry.key.as_deref().unwrap_or(name.as_str()),
                    entry.value.as_str(),
                )
            })
        })
    }
}
